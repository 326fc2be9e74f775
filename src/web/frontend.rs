//! Embedded HTML/CSS/JS shell for the infractl dashboard.
//!
//! The page holds only mount points and controls. Everything that depends on
//! backend data arrives as view patches from `/ui/view` and is applied by
//! element id, so the markup here never needs to know what a server or an
//! alert looks like.
//!
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>InfraControl</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border-color: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent-blue: #58a6ff;
  --accent-green: #3fb950;
  --accent-yellow: #d29922;
  --accent-red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

[data-theme="light"] {
  --bg: #f6f8fa;
  --surface: #ffffff;
  --border-color: #d0d7de;
  --text: #1f2328;
  --text-muted: #656d76;
  --accent-blue: #0969da;
  --accent-green: #1a7f37;
  --accent-yellow: #9a6700;
  --accent-red: #cf222e;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
  display: flex;
  min-height: 100vh;
}

/* Sidebar */
#sidebar {
  width: 220px;
  background: var(--surface);
  border-right: 1px solid var(--border-color);
  padding: 20px 12px;
  flex-shrink: 0;
}

#sidebar .logo {
  font-family: var(--mono);
  font-weight: 700;
  font-size: 18px;
  color: var(--accent-blue);
  margin-bottom: 24px;
  padding: 0 8px;
}

.nav-item {
  display: block;
  width: 100%;
  text-align: left;
  padding: 8px 12px;
  margin-bottom: 4px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}

.nav-item:hover { color: var(--text); background: rgba(127,127,127,0.08); }
.nav-item.active { background: var(--accent-blue); color: #fff; }

/* Main */
main { flex: 1; padding: 24px; min-width: 0; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border-color);
}

header h1 { font-size: 22px; font-weight: 600; }

.header-right {
  display: flex;
  align-items: center;
  gap: 16px;
  color: var(--text-muted);
  font-size: 13px;
}

#live-clock { font-family: var(--mono); color: var(--text); }

.status-light {
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 50%;
  background: var(--text-muted);
}
.status-light-green { background: var(--accent-green); box-shadow: 0 0 6px var(--accent-green); }
.status-light-red { background: var(--accent-red); box-shadow: 0 0 6px var(--accent-red); }

/* Notifications */
#notification-bell { position: relative; cursor: pointer; user-select: none; }

#notification-count {
  position: absolute;
  top: -8px;
  right: -10px;
  min-width: 16px;
  height: 16px;
  border-radius: 8px;
  background: var(--accent-red);
  color: #fff;
  font-size: 10px;
  align-items: center;
  justify-content: center;
  padding: 0 4px;
  display: none;
}

#notification-dropdown {
  display: none;
  flex-direction: column;
  position: absolute;
  top: 28px;
  right: 0;
  width: 300px;
  max-height: 360px;
  overflow-y: auto;
  background: var(--surface);
  border: 1px solid var(--border-color);
  border-radius: var(--radius);
  padding: 8px;
  z-index: 20;
  cursor: default;
}

.notification-item {
  padding: 8px;
  border-bottom: 1px solid var(--border-color);
  color: var(--text);
  font-size: 12px;
}

.notification-empty { padding: 12px; text-align: center; color: var(--text-muted); }

#alert-banner {
  display: none;
  align-items: center;
  gap: 10px;
  padding: 10px 16px;
  margin-bottom: 16px;
  border: 1px solid var(--accent-red);
  border-radius: var(--radius);
  color: var(--accent-red);
  background: rgba(248,81,73,0.08);
}

/* Views */
.view-section { display: none; }
.view-section.active { display: block; }

.grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
  gap: 16px;
}

.card, .domain-card, .monitoring-card {
  background: var(--surface);
  border: 1px solid var(--border-color);
  border-radius: var(--radius);
  padding: 16px;
}

.card-title {
  display: flex;
  align-items: center;
  justify-content: space-between;
  font-weight: 600;
  margin-bottom: 12px;
}

.metric-item {
  display: flex;
  align-items: center;
  gap: 6px;
  padding: 3px 0;
  font-size: 13px;
}

.metric-item .usage-value { margin-left: auto; font-family: var(--mono); }
.text-muted { color: var(--text-muted); }
.usage-low { color: var(--accent-green); }
.usage-med { color: var(--accent-yellow); }
.usage-high { color: var(--accent-red); font-weight: 600; }

.status-dot { width: 10px; height: 10px; border-radius: 50%; display: inline-block; }
.status-online { background: var(--accent-green); }
.status-offline { background: var(--accent-red); }

.cluster-header {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}

.cluster-header .label { color: var(--text-muted); font-size: 12px; }
.cluster-header .value { font-size: 16px; font-weight: 600; font-family: var(--mono); }
.cluster-role { margin-top: 10px; font-size: 12px; color: var(--text-muted); }

.badge {
  display: inline-flex;
  align-items: center;
  padding: 2px 8px;
  margin-left: 8px;
  border-radius: 10px;
  font-size: 11px;
  border: 1px solid var(--border-color);
}

.domain-actions {
  display: flex;
  gap: 8px;
  margin-top: 12px;
  padding-top: 12px;
  border-top: 1px solid var(--border-color);
}

.monitoring-card p { color: var(--text-muted); font-size: 12px; margin-bottom: 12px; }

.user-row {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 10px 0;
  border-bottom: 1px solid var(--border-color);
}

.user-name { font-weight: 600; }

/* Controls */
.btn {
  display: inline-block;
  padding: 6px 14px;
  border-radius: 6px;
  border: 1px solid var(--border-color);
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  text-decoration: none;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent-blue); }
.btn.primary { background: var(--accent-blue); border-color: var(--accent-blue); color: #fff; }
.btn-icon { padding: 4px 8px; }
.btn-delete, .btn-user-delete { color: var(--accent-red); }
.btn-disabled { opacity: 0.5; cursor: not-allowed; }

.toolbar { display: flex; justify-content: flex-end; gap: 8px; margin-bottom: 16px; }

input, select {
  padding: 6px 10px;
  border: 1px solid var(--border-color);
  border-radius: 6px;
  background: var(--bg);
  color: var(--text);
  font-size: 13px;
}

#user-add-section { display: flex; gap: 8px; margin-bottom: 16px; }

/* Modal */
.modal {
  display: none;
  position: fixed;
  inset: 0;
  background: rgba(0,0,0,0.5);
  align-items: center;
  justify-content: center;
  z-index: 50;
}

.modal-body {
  background: var(--surface);
  border: 1px solid var(--border-color);
  border-radius: var(--radius);
  padding: 20px;
  width: 360px;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

/* Icons (plain glyphs, no icon font) */
.fa-solid { font-style: normal; }
.fa-server::before { content: "\25A3"; }
.fa-network-wired::before { content: "\2301"; }
.fa-microchip::before { content: "\25A6"; }
.fa-memory::before { content: "\2261"; }
.fa-hard-drive::before { content: "\25A4"; }
.fa-clock::before, .fa-clock-rotate-left::before { content: "\25F7"; }
.fa-globe::before { content: "\25CE"; }
.fa-bolt::before { content: "\21AF"; }
.fa-users::before { content: "\263A"; }
.fa-gauge::before { content: "\25D4"; }
.fa-pen::before { content: "\270E"; }
.fa-trash::before { content: "\2715"; }
.fa-user-minus::before { content: "\2212"; }
.fa-crown::before { content: "\265B"; }
.fa-terminal::before { content: ">_"; font-family: var(--mono); }

/* Toast */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--accent-green);
  color: #fff;
  font-size: 13px;
  font-weight: 500;
  opacity: 0;
  transform: translateY(10px);
  transition: all 0.3s;
  z-index: 100;
  pointer-events: none;
}
.toast.show { opacity: 1; transform: translateY(0); }
.toast.error { background: var(--accent-red); }
</style>
</head>
<body>

<aside id="sidebar">
  <div class="logo">InfraControl</div>
  <button class="nav-item active" data-view="view-servers">Servers</button>
  <button class="nav-item" data-view="view-cluster">Cluster</button>
  <button class="nav-item" data-view="view-websites">Websites</button>
  <button class="nav-item" data-view="view-console">Console</button>
  <button class="nav-item" data-view="view-users">Users</button>
</aside>

<main>
  <header>
    <h1 id="view-title">Servers</h1>
    <div class="header-right">
      <span id="connection-label">Connecting...</span>
      <span>Updated <span id="last-update-nav">--</span></span>
      <span id="live-clock">--:--:--</span>
      <span id="system-status-light" class="status-light"></span>
      <span id="notification-bell">&#x1F514;
        <span id="notification-count">0</span>
        <div id="notification-dropdown">
          <div id="notification-list"></div>
          <button class="btn" id="btn-clear-alerts" style="margin-top: 8px;">Clear alerts</button>
        </div>
      </span>
      <button class="btn btn-icon" id="theme-toggle" title="Toggle theme">&#x263E;</button>
      <span id="nav-username"></span>
    </div>
  </header>

  <div id="alert-banner"><b>&#x26A0;</b> <span id="alert-msg"></span></div>

  <section class="view-section active" id="view-servers">
    <div class="grid" id="grid-servers"></div>
  </section>

  <section class="view-section" id="view-cluster">
    <div class="cluster-header card">
      <div><div class="label">Health</div><div class="value" id="cluster-health-text">--</div></div>
      <div><div class="label">Cluster IP</div><div class="value" id="cluster-ip-text">--</div></div>
      <div><div class="label">Shared load</div><div class="value" id="cluster-load-text">--</div></div>
      <div>
        <div class="label">Services</div>
        <div>corosync <span class="badge" id="status-corosync-badge">--</span></div>
        <div>pacemaker <span class="badge" id="status-pacemaker-badge">--</span></div>
        <div>pcsd <span class="badge" id="status-pcsd-badge">--</span></div>
      </div>
    </div>
    <div class="grid" id="grid-cluster"></div>
  </section>

  <section class="view-section" id="view-websites">
    <div class="toolbar">
      <button class="btn primary" id="btn-add-domain">Add domain</button>
    </div>
    <div class="grid" id="grid-websites"></div>
  </section>

  <section class="view-section" id="view-console">
    <div class="grid" id="cockpit-grid"></div>
  </section>

  <section class="view-section" id="view-users">
    <div id="user-add-section">
      <input type="text" id="input-username" placeholder="username">
      <select id="input-role">
        <option value="Viewer">Viewer</option>
        <option value="Admin">Admin</option>
      </select>
      <button class="btn primary" id="btn-add-user">Add user</button>
    </div>
    <div id="user-list-container"></div>
  </section>
</main>

<div class="modal" id="modal-domain">
  <div class="modal-body">
    <h3 id="modal-domain-title">Add New Domain</h3>
    <input type="hidden" id="input-old-domain">
    <input type="text" id="input-domain" placeholder="example.com">
    <div class="toolbar">
      <button class="btn" id="btn-close-modal">Cancel</button>
      <button class="btn primary" id="btn-save-domain">Save</button>
    </div>
  </div>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
const VIEW_INTERVAL = 1000;
const applied = new Map();
const timers = new Map();
let generation = -1;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

// ---------------------------------------------------------------------------
// Patch application
// ---------------------------------------------------------------------------
function applyPatch(p, fresh) {
  const el = document.getElementById(p.target);
  if (!el) return;

  const key = p.target + ':' + p.op;
  const value = JSON.stringify(p);
  if (!fresh && applied.get(key) === value) return;
  applied.set(key, value);

  switch (p.op) {
    case 'html': el.innerHTML = p.html; break;
    case 'text': el.textContent = p.text; break;
    case 'class': el.className = p.class; break;
    case 'display': el.style.display = p.value; break;
    case 'color': el.style.color = p.value; break;
    case 'hide_after':
      clearTimeout(timers.get(p.target));
      // The cached display entry is kept, so the element stays hidden
      // until a new generation re-applies it.
      timers.set(p.target, setTimeout(() => { el.style.display = 'none'; }, p.ms));
      break;
  }
}

async function refreshView() {
  try {
    const view = await api('GET', '/ui/view');
    const fresh = view.generation !== generation;
    generation = view.generation;
    view.patches.forEach(p => applyPatch(p, fresh));

    document.getElementById('live-clock').textContent = view.clock;
    document.getElementById('last-update-nav').textContent = view.last_update;
    const label = document.getElementById('connection-label');
    label.textContent = view.connection_label;
    label.title = view.last_error || '';
    label.style.color = view.connection === 'unhealthy' ? 'var(--accent-red)' : '';
    document.getElementById('nav-username').textContent = view.session.username;
    document.documentElement.setAttribute('data-theme', view.theme);
  } catch (e) {
    document.getElementById('connection-label').textContent = 'Shell offline';
  }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.querySelectorAll('.nav-item').forEach(item => {
  item.addEventListener('click', () => {
    document.querySelectorAll('.nav-item').forEach(n => n.classList.remove('active'));
    item.classList.add('active');
    document.querySelectorAll('.view-section').forEach(s => s.classList.remove('active'));
    document.getElementById(item.dataset.view).classList.add('active');
    document.getElementById('view-title').textContent = item.textContent;
  });
});

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------
document.getElementById('notification-bell').addEventListener('click', e => {
  const dropdown = document.getElementById('notification-dropdown');
  dropdown.style.display = dropdown.style.display === 'flex' ? 'none' : 'flex';
  e.stopPropagation();
});

document.getElementById('notification-dropdown').addEventListener('click', e => e.stopPropagation());

document.addEventListener('click', () => {
  document.getElementById('notification-dropdown').style.display = 'none';
});

document.getElementById('btn-clear-alerts').addEventListener('click', async () => {
  const res = await api('POST', '/ui/alerts/clear');
  if (res.cleared > 0) toast(`Dismissed ${res.cleared} alert(s)`);
  refreshView();
});

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------
document.getElementById('theme-toggle').addEventListener('click', async () => {
  try {
    const res = await api('POST', '/ui/theme');
    if (res.error) return toast(res.error, true);
    document.documentElement.setAttribute('data-theme', res.theme);
  } catch (e) {
    toast('Failed to save theme: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------
function openDomainModal(title, oldName) {
  document.getElementById('modal-domain-title').textContent = title;
  document.getElementById('input-old-domain').value = oldName;
  document.getElementById('input-domain').value = oldName;
  document.getElementById('modal-domain').style.display = 'flex';
}

function closeDomainModal() {
  document.getElementById('modal-domain').style.display = 'none';
}

async function mutate(method, path, body) {
  try {
    const res = await api(method, path, body);
    if (res.success) {
      toast('Done');
    } else {
      toast(res.message || res.error || 'Request failed', true);
    }
  } catch (e) {
    toast('Network error', true);
  }
  refreshView();
}

document.getElementById('btn-add-domain').addEventListener('click', () => openDomainModal('Add New Domain', ''));
document.getElementById('btn-close-modal').addEventListener('click', closeDomainModal);

document.getElementById('btn-save-domain').addEventListener('click', async () => {
  const input = document.getElementById('input-domain').value.trim();
  const oldName = document.getElementById('input-old-domain').value;
  if (!input) return;
  closeDomainModal();
  if (oldName) {
    await mutate('PUT', '/ui/domains', { old_name: oldName, new_name: input });
  } else {
    await mutate('POST', '/ui/domains', { domain: input });
  }
});

document.getElementById('grid-websites').addEventListener('click', async e => {
  const rename = e.target.closest('.btn-rename');
  if (rename) return openDomainModal('Rename Domain', rename.dataset.domain);
  const del = e.target.closest('.btn-delete');
  if (del && confirm(`Delete ${del.dataset.domain}?`)) {
    await mutate('DELETE', '/ui/domains', { domain: del.dataset.domain });
  }
});

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------
document.getElementById('btn-add-user').addEventListener('click', async () => {
  const username = document.getElementById('input-username').value.trim();
  const role = document.getElementById('input-role').value;
  if (!username) return;
  document.getElementById('input-username').value = '';
  await mutate('POST', '/ui/users', { username, role });
});

document.getElementById('user-list-container').addEventListener('click', async e => {
  const del = e.target.closest('.btn-user-delete');
  if (del && confirm(`Delete user ${del.dataset.username}?`)) {
    await mutate('DELETE', '/ui/users', { username: del.dataset.username });
  }
});

// ---------------------------------------------------------------------------
// Visibility + init
// ---------------------------------------------------------------------------
document.addEventListener('visibilitychange', async () => {
  try {
    await api('POST', '/ui/visibility', { hidden: document.hidden });
  } catch (e) {
    return;
  }
  if (!document.hidden) refreshView();
});

api('POST', '/ui/refresh').finally(refreshView);
setInterval(() => { if (!document.hidden) refreshView(); }, VIEW_INTERVAL);
</script>
</body>
</html>
"##;
