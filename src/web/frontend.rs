//! Embedded HTML/CSS/JS page for the MVP prompt generator.
//!
//! The entire page is compiled into the binary as a string constant. No
//! external assets, no build tools, no CDN dependencies. The script mirrors
//! the page state machine in `crate::ui`: one generate call in flight, the
//! result kept until replaced, at most one feedback panel, and stats fetched
//! browser-direct from the public backend URL.

/// Placeholder replaced with the JSON-encoded public backend URL.
const PUBLIC_BACKEND_PLACEHOLDER: &str = "__PUBLIC_BACKEND_URL__";

/// Render the page with the browser-direct backend URL baked in.
pub fn render_index(public_backend_url: &str) -> String {
    let encoded = serde_json::to_string(public_backend_url.trim_end_matches('/'))
        .unwrap_or_else(|_| "\"\"".to_string())
        // Keep the literal from closing the surrounding <script> element.
        .replace("</", "<\\/");
    INDEX_HTML.replace(PUBLIC_BACKEND_PLACEHOLDER, &encoded)
}

/// The complete single-page HTML.
const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>GitHub MVP Generator</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 900px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); }

.hero { text-align: center; margin-bottom: 24px; }
.hero h2 { font-size: 28px; margin-bottom: 8px; }
.hero p { color: var(--text-muted); }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
  gap: 12px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  text-align: center;
}
.stat-card .value { font-size: 26px; font-weight: 700; font-family: var(--mono); color: var(--accent); }
.stat-card .label { font-size: 12px; color: var(--text-muted); text-transform: uppercase; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h3 { font-size: 16px; margin-bottom: 12px; display: flex; justify-content: space-between; align-items: center; }
.hint { color: var(--text-muted); font-size: 12px; margin-top: 8px; }

.row { display: flex; gap: 8px; }
input[type="text"], textarea {
  flex: 1;
  width: 100%;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 8px 10px;
  font-family: var(--font);
  font-size: 14px;
}
textarea { min-height: 80px; resize: vertical; }
textarea.prompt { min-height: 400px; font-family: var(--mono); font-size: 13px; }
input:focus, textarea:focus { outline: none; border-color: var(--accent); }

button {
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--accent);
  color: #fff;
  font-weight: 500;
  cursor: pointer;
}
button.secondary { background: transparent; color: var(--text); }
button:disabled { opacity: 0.6; cursor: default; }

.ratings { display: flex; gap: 16px; margin-bottom: 12px; }
.ratings label { cursor: pointer; }
.field { margin-bottom: 12px; }
.field > label { display: block; font-size: 12px; color: var(--text-muted); margin-bottom: 4px; }
.center { text-align: center; }
.hidden { display: none; }

.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 10px 16px;
  border-radius: 6px;
  background: var(--surface);
  border: 1px solid var(--green);
  opacity: 0;
  transition: opacity 0.2s;
}
.toast.show { opacity: 1; }
.toast.error { border-color: var(--red); }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span class="logo">&gt;_</span> GitHub MVP Generator</h1>
  </header>

  <section class="hero">
    <h2>Generate MVP Prompts from GitHub Repos</h2>
    <p>Paste any GitHub repository URL and get a comprehensive prompt for building your MVP</p>
  </section>

  <div id="stats" class="stats-grid hidden">
    <div class="stat-card"><div class="value" id="stat-ops">0</div><div class="label">Total Generations</div></div>
    <div class="stat-card"><div class="value" id="stat-rate">0%</div><div class="label">Success Rate</div></div>
    <div class="stat-card"><div class="value" id="stat-feedback">0</div><div class="label">Feedback Received</div></div>
    <div class="stat-card"><div class="value" id="stat-rating">0.0</div><div class="label">Average Rating</div></div>
  </div>

  <div class="card">
    <h3>GitHub Repository URL</h3>
    <div class="row">
      <input type="text" id="url" placeholder="https://github.com/username/repository">
      <button id="btn-generate">Generate Prompt</button>
    </div>
    <p class="hint">Example: https://github.com/facebook/react or https://github.com/vercel/next.js</p>
  </div>

  <div id="result" class="card hidden">
    <h3>Generated MVP Prompt <button id="btn-copy" class="secondary">Copy</button></h3>
    <textarea id="prompt" class="prompt" readonly></textarea>
    <p class="hint">Use this prompt with your favorite AI assistant to get detailed MVP guidance</p>
  </div>

  <div id="feedback-open" class="center hidden">
    <button id="btn-feedback" class="secondary">Provide Feedback on This Prompt</button>
  </div>

  <form id="feedback" class="card hidden">
    <h3>Provide Feedback</h3>
    <div class="field">
      <label>Rating</label>
      <div class="ratings" id="ratings"></div>
    </div>
    <div class="field">
      <label for="comments">Comments</label>
      <textarea id="comments" placeholder="What did you like about the generated prompt?"></textarea>
    </div>
    <div class="field">
      <label for="improvements">Suggestions for Improvement</label>
      <textarea id="improvements" placeholder="How could we make the prompt better?"></textarea>
    </div>
    <button type="submit" id="btn-submit">Submit Feedback</button>
  </form>
</div>

<div id="toast" class="toast"></div>

<script>
const PUBLIC_BACKEND_URL = __PUBLIC_BACKEND_URL__;
const COPIED_MS = 2000;

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------
const page = {
  generating: false,
  requestId: 0,
  result: null,          // { prompt, repoName, url }
  feedbackOpen: false,
  submittingFeedback: false,
};

const $ = id => document.getElementById(id);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------
function toast(msg, isError) {
  const el = $('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

async function post(path, body, fallback) {
  let res;
  try {
    res = await fetch(path, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
  } catch (e) {
    throw new Error(fallback);
  }
  const data = await res.json().catch(() => ({}));
  if (!res.ok) throw new Error(data.error || fallback);
  return data;
}

function render() {
  $('btn-generate').disabled = page.generating;
  $('btn-generate').textContent = page.generating ? 'Analyzing...' : 'Generate Prompt';
  $('result').classList.toggle('hidden', !page.result);
  $('prompt').value = page.result ? page.result.prompt : '';
  $('feedback-open').classList.toggle('hidden', !page.result || page.generating || page.feedbackOpen);
  $('feedback').classList.toggle('hidden', !page.result || !page.feedbackOpen);
  $('btn-submit').disabled = page.submittingFeedback;
  $('btn-submit').textContent = page.submittingFeedback ? 'Submitting...' : 'Submit Feedback';
}

// ---------------------------------------------------------------------------
// Stats (browser-direct)
// ---------------------------------------------------------------------------
async function fetchStats() {
  try {
    const res = await fetch(`${PUBLIC_BACKEND_URL}/api/stats`);
    if (!res.ok) return;
    const s = await res.json();
    const perf = s.performance || {};
    const fb = s.feedback || {};
    $('stat-ops').textContent = perf.total_operations || 0;
    $('stat-rate').textContent = perf.success_rate ? `${Math.round(perf.success_rate)}%` : '0%';
    $('stat-feedback').textContent = fb.total_feedback || 0;
    $('stat-rating').textContent = fb.average_rating ? Number(fb.average_rating).toFixed(1) : '0.0';
    $('stats').classList.remove('hidden');
  } catch (e) {
    console.error('Failed to fetch stats:', e);
  }
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------
async function generate() {
  if (page.generating) return;
  const url = $('url').value.trim();
  if (!url) {
    toast('Please enter a GitHub repository URL', true);
    return;
  }

  const id = ++page.requestId;
  page.generating = true;
  page.feedbackOpen = false;
  render();

  try {
    const data = await post('/generate', { githubUrl: url }, 'Failed to generate prompt');
    if (id !== page.requestId) return;
    page.result = { prompt: data.prompt, repoName: data.repoName, url };
    toast('MVP prompt generated successfully!');
  } catch (e) {
    if (id !== page.requestId) return;
    toast(e.message, true);
  } finally {
    if (id === page.requestId) {
      page.generating = false;
      render();
    }
  }
}

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------
async function copyPrompt() {
  if (!page.result) return;
  try {
    await navigator.clipboard.writeText(page.result.prompt);
    $('btn-copy').textContent = 'Copied';
    toast('Prompt copied to clipboard');
    setTimeout(() => $('btn-copy').textContent = 'Copy', COPIED_MS);
  } catch (e) {
    toast('Failed to copy to clipboard', true);
  }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------
function buildRatings() {
  const box = $('ratings');
  for (let v = 1; v <= 5; v++) {
    box.insertAdjacentHTML('beforeend',
      `<label><input type="radio" name="rating" value="${v}"> ${v} &#9733;</label>`);
  }
}

function resetFeedbackFields() {
  document.querySelectorAll('input[name="rating"]').forEach(r => r.checked = false);
  $('comments').value = '';
  $('improvements').value = '';
}

async function submitFeedback(e) {
  e.preventDefault();
  if (page.submittingFeedback || !page.result) return;
  const picked = document.querySelector('input[name="rating"]:checked');
  if (!picked) {
    toast('Please select a rating', true);
    return;
  }

  page.submittingFeedback = true;
  render();
  try {
    await post('/submit-feedback', {
      githubUrl: page.result.url,
      rating: parseInt(picked.value, 10),
      comments: $('comments').value,
      improvements: $('improvements').value,
    }, 'Failed to submit feedback');
    toast('Thank you for your feedback!');
    resetFeedbackFields();
    page.feedbackOpen = false;
    fetchStats();
    toast('Thank You! Your feedback helps us improve.');
  } catch (err) {
    toast(err.message, true);
  } finally {
    page.submittingFeedback = false;
    render();
  }
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
$('btn-generate').addEventListener('click', generate);
$('url').addEventListener('keydown', e => { if (e.key === 'Enter') generate(); });
$('btn-copy').addEventListener('click', copyPrompt);
$('btn-feedback').addEventListener('click', () => {
  if (!page.result || page.generating) return;
  page.feedbackOpen = true;
  render();
});
$('feedback').addEventListener('submit', submitFeedback);
buildRatings();
render();
fetchStats();
</script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_injects_public_backend_url() {
        let html = render_index("http://stats.example.com:5000/");
        assert!(html.contains(r#"const PUBLIC_BACKEND_URL = "http://stats.example.com:5000";"#));
        assert!(!html.contains(PUBLIC_BACKEND_PLACEHOLDER));
    }

    #[test]
    fn render_escapes_script_breakout() {
        let html = render_index("http://x/</script><script>alert(1)");
        assert!(!html.contains("</script><script>alert(1)"));
    }

    #[test]
    fn feedback_button_is_unavailable_while_generating() {
        assert!(INDEX_HTML.contains(
            "toggle('hidden', !page.result || page.generating || page.feedbackOpen)"
        ));
        assert!(INDEX_HTML.contains("if (!page.result || page.generating) return;"));
    }

    #[test]
    fn page_calls_proxy_routes() {
        assert!(INDEX_HTML.contains("'/generate'"));
        assert!(INDEX_HTML.contains("'/submit-feedback'"));
        assert!(INDEX_HTML.contains("/api/stats"));
    }
}
