//! 内嵌前端页面
//!
//! 单文件外壳：主题输入、两个工作流标签页，轮询 state/preview 刷新进度。

pub const SHELL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>RedGreen Studio</title>
<style>
  :root { --accent: #07c160; --accent-red: #ff2442; }
  * { box-sizing: border-box; }
  body { margin: 0; font-family: -apple-system, "Segoe UI", sans-serif; background: #f3f4f6; color: #1f2937; }
  header { background: #fff; border-bottom: 1px solid #e5e7eb; padding: 14px 24px; display: flex; align-items: center; gap: 16px; }
  header h1 { font-size: 18px; margin: 0; }
  .tabs { display: flex; gap: 8px; }
  .tab { border: none; background: transparent; padding: 8px 14px; border-radius: 8px; cursor: pointer; font-size: 14px; }
  .tab.active[data-kind="article"] { background: var(--accent); color: #fff; }
  .tab.active[data-kind="post"] { background: var(--accent-red); color: #fff; }
  main { max-width: 1100px; margin: 24px auto; padding: 0 24px; display: grid; grid-template-columns: 360px 1fr; gap: 24px; }
  .panel { background: #fff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; }
  .panel label { display: block; font-size: 13px; color: #6b7280; margin-bottom: 6px; }
  .panel input[type="text"] { width: 100%; padding: 10px 12px; border: 1px solid #d1d5db; border-radius: 8px; font-size: 14px; }
  #image-count-field { margin-top: 12px; }
  #image-count-field select { width: 100%; padding: 9px 12px; border: 1px solid #d1d5db; border-radius: 8px; font-size: 14px; background: #fff; }
  body[data-kind="post"] #image-count-field { display: none; }
  .panel button.primary { width: 100%; margin-top: 14px; padding: 11px; border: none; border-radius: 8px; color: #fff; font-size: 14px; cursor: pointer; background: var(--accent); }
  .panel button.primary[disabled] { opacity: .5; cursor: not-allowed; }
  body[data-kind="post"] .panel button.primary { background: var(--accent-red); }
  .panel button.secondary { width: 100%; margin-top: 10px; padding: 10px; border: 1px solid #d1d5db; border-radius: 8px; background: #fff; font-size: 14px; cursor: pointer; }
  #status { margin-top: 12px; font-size: 13px; color: #6b7280; min-height: 18px; }
  #preview { min-height: 480px; }
  .empty-state, .progress-state, .error-state { display: flex; align-items: center; justify-content: center; min-height: 420px; color: #9ca3af; font-size: 14px; }
  .error-state { color: #dc2626; }
  .pulse { animation: pulse 1.6s ease-in-out infinite; }
  @keyframes pulse { 0%, 100% { opacity: 1; } 50% { opacity: .45; } }
  .wechat-preview .preview-header { font-size: 12px; color: #9ca3af; margin-bottom: 12px; }
  .wechat-preview .preview-content { max-width: 640px; }
  .wechat-preview h1 { font-size: 22px; }
  .wechat-preview .paragraph { line-height: 1.8; margin: 12px 0; }
  .image-slot { margin: 16px 0; }
  .image-slot img { max-width: 100%; border-radius: 8px; }
  .image-slot figcaption { font-size: 12px; color: #9ca3af; text-align: center; }
  div.image-slot { background: #f3f4f6; border-radius: 8px; min-height: 180px; display: flex; align-items: center; justify-content: center; color: #9ca3af; font-size: 13px; }
  div.image-slot-error { color: #dc2626; }
  .redbook-preview { display: flex; gap: 24px; flex-wrap: wrap; }
  .phone-frame { width: 320px; border: 8px solid #111; border-radius: 28px; overflow: hidden; background: #fff; }
  .cover img { width: 100%; display: block; }
  .cover-loading, .cover-blank { height: 260px; background: #f3f4f6; display: flex; align-items: center; justify-content: center; color: #9ca3af; font-size: 13px; }
  .dots { display: flex; justify-content: center; gap: 5px; padding: 8px 0; }
  .dot { width: 6px; height: 6px; border-radius: 50%; background: #d1d5db; }
  .dot-active { background: var(--accent-red); }
  .post-body { padding: 0 16px 16px; }
  .post-body h1 { font-size: 17px; }
  .post-content { font-size: 14px; line-height: 1.7; }
  .tags { margin-top: 10px; display: flex; flex-wrap: wrap; gap: 6px; }
  .tag { color: #2563eb; font-size: 13px; }
  .assets-grid { flex: 1; min-width: 220px; display: grid; grid-template-columns: repeat(2, 1fr); gap: 10px; align-content: start; }
  .asset { aspect-ratio: 1; border-radius: 8px; overflow: hidden; background: #f3f4f6; display: flex; align-items: center; justify-content: center; color: #dc2626; font-size: 12px; }
  .asset img { width: 100%; height: 100%; object-fit: cover; }
</style>
</head>
<body data-kind="article">
<header>
  <h1>RedGreen Studio</h1>
  <nav class="tabs">
    <button class="tab active" data-kind="article">WeChat Article</button>
    <button class="tab" data-kind="post">Xiaohongshu Post</button>
  </nav>
</header>
<main>
  <section class="panel">
    <label for="topic">Topic</label>
    <input id="topic" type="text" placeholder="e.g. 5 summer wellness tips"/>
    <div id="image-count-field">
      <label for="image-count">Images</label>
      <select id="image-count">
        <option value="1">1</option>
        <option value="2" selected>2</option>
        <option value="3">3</option>
        <option value="4">4</option>
        <option value="5">5</option>
      </select>
    </div>
    <button id="generate" class="primary">Generate</button>
    <button id="export" class="secondary" hidden>Copy to Clipboard</button>
    <div id="status"></div>
  </section>
  <section class="panel" id="preview"></section>
</main>
<script>
  let kind = "article";
  let timer = null;

  const topicInput = document.getElementById("topic");
  const imageCountSelect = document.getElementById("image-count");
  const generateBtn = document.getElementById("generate");
  const exportBtn = document.getElementById("export");
  const statusEl = document.getElementById("status");
  const previewEl = document.getElementById("preview");

  document.querySelectorAll(".tab").forEach((tab) => {
    tab.addEventListener("click", () => {
      kind = tab.dataset.kind;
      document.body.dataset.kind = kind;
      document.querySelectorAll(".tab").forEach((t) => t.classList.toggle("active", t === tab));
      exportBtn.hidden = kind !== "article";
      refresh();
    });
  });

  async function refresh() {
    const [stateRes, previewRes] = await Promise.all([
      fetch(`/api/${kind}/state`),
      fetch(`/api/${kind}/preview`),
    ]);
    const state = await stateRes.json();
    previewEl.innerHTML = await previewRes.text();

    const busy = state.phase === "generating_text" || state.phase === "generating_images";
    generateBtn.disabled = busy;
    if (state.phase === "generating_text") statusEl.textContent = "Writing content...";
    else if (state.phase === "generating_images") statusEl.textContent = "Generating images...";
    else if (state.phase === "error") statusEl.textContent = "Generation failed. Please try again.";
    else if (state.phase === "complete") statusEl.textContent = "Done.";
    else statusEl.textContent = "";

    if (!busy && timer) { clearInterval(timer); timer = null; }
  }

  generateBtn.addEventListener("click", async () => {
    const topic = topicInput.value;
    const body = kind === "article"
      ? { topic, imageCount: Number(imageCountSelect.value) }
      : { topic };
    const res = await fetch(`/api/${kind}/generate`, {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(body),
    });
    const data = await res.json();
    if (!data.started) { statusEl.textContent = "Please enter a topic first."; return; }
    if (timer) clearInterval(timer);
    timer = setInterval(refresh, 800);
    refresh();
  });

  exportBtn.addEventListener("click", async () => {
    const res = await fetch("/api/article/export", { method: "POST" });
    const data = await res.json();
    statusEl.textContent = data.message;
  });

  // 点击已生成的图片在新窗口查看原图
  previewEl.addEventListener("click", (event) => {
    const img = event.target.closest(".asset img, .image-slot img, .cover img");
    if (img) window.open(img.src);
  });

  refresh();
</script>
</body>
</html>
"#;
