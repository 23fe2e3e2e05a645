//! Demo playground server with a split-pane editor/console page.
//!
//! Run with: cargo run -p web-server-demo
//!
//! Then open http://localhost:3000 in your browser.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, response::Html, routing::get};
use luapad_core::Executor;
use luapad_sandbox::LuaSandbox;
use luapad_transport::websocket::create_ws_router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let executor: Arc<dyn Executor> = Arc::new(LuaSandbox::new());

    // Build router
    let app = Router::new()
        .route("/", get(index_handler))
        .merge(create_ws_router(executor))
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = std::env::var("LUAPAD_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    tracing::info!("Playground listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>luapad</title>
    <style>
        * { box-sizing: border-box; }
        body {
            margin: 0;
            background: #1e1e1e;
            color: #d4d4d4;
            font-family: system-ui, sans-serif;
        }
        .wrap {
            display: flex;
            height: 100vh;
        }
        #editor {
            width: 50%;
            height: 100%;
            resize: none;
            border: none;
            border-right: 1px solid #3c3c3c;
            outline: none;
            padding: 12px;
            background: #1e1e1e;
            color: #d4d4d4;
            font-family: Menlo, Monaco, 'Courier New', monospace;
            font-size: 14px;
        }
        .side {
            width: 50%;
            display: flex;
            flex-direction: column;
        }
        .toolbar {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 6px 10px;
            border-bottom: 1px solid #3c3c3c;
            font-size: 13px;
        }
        .toolbar button {
            background: #2d2d2d;
            color: #d4d4d4;
            border: 1px solid #3c3c3c;
            border-radius: 3px;
            padding: 2px 10px;
            cursor: pointer;
        }
        .status { color: #888; }
        .status.connected { color: #4a4; }
        .status.disconnected { color: #a44; }
        .console {
            flex: 1;
            overflow: auto;
            font-family: Menlo, Monaco, 'Courier New', monospace;
            font-size: 13px;
        }
        .entry {
            padding: 3px 10px;
            border-bottom: 1px solid #2a2a2a;
            white-space: pre-wrap;
        }
        .entry.error { color: #f48771; }
        .entry.divider {
            color: #808080;
            font-style: italic;
            text-align: center;
        }
        .value { margin-right: 10px; }
        .value.string { color: #ce9178; }
        .value.number { color: #b5cea8; }
        .value.boolean.true { color: #4ec9b0; }
        .value.boolean.false { color: #d16969; }
        .value.nil, .value.opaque { color: #808080; font-style: italic; }
        details.value { display: inline-block; vertical-align: top; }
        details.value > summary { color: #9cdcfe; cursor: pointer; }
        ul.tree {
            list-style: none;
            margin: 2px 0;
            padding-left: 18px;
        }
        ul.tree summary { cursor: pointer; color: #9cdcfe; }
        .trace { color: #9a6868; white-space: pre-wrap; }
    </style>
</head>
<body>
    <div class="wrap">
        <textarea id="editor" spellcheck="false">-- luapad: code runs as you type, Ctrl+Enter runs now
console.log('hello from luapad')
console.log({greeting = 'hi', count = 42, nested = {1, 2, 3}})</textarea>
        <div class="side">
            <div class="toolbar">
                <span class="status" id="status">Connecting...</span>
                <button id="clear">Clear</button>
            </div>
            <div class="console" id="console"></div>
        </div>
    </div>

    <script>
        const editor = document.getElementById('editor');
        const pane = document.getElementById('console');
        const status = document.getElementById('status');
        let ws;
        let debounce = null;

        function connect() {
            const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
            ws = new WebSocket(`${protocol}//${window.location.host}/ws`);

            ws.onopen = () => {
                status.textContent = 'Connected';
                status.className = 'status connected';
                run();
            };

            ws.onclose = () => {
                status.textContent = 'Disconnected - reconnecting...';
                status.className = 'status disconnected';
                setTimeout(connect, 2000);
            };

            ws.onmessage = (event) => {
                try {
                    const msg = JSON.parse(event.data);
                    if (msg.type === 'entry') {
                        appendEntry(msg.entry);
                    } else if (msg.type === 'reset') {
                        pane.innerHTML = '';
                    }
                } catch (e) {
                    console.error('Failed to parse message:', e);
                }
            };
        }

        function appendEntry(entry) {
            const row = document.createElement('div');
            if (entry.kind === 'output') {
                row.className = 'entry';
                for (const value of entry.values) {
                    row.appendChild(renderValue(value));
                }
            } else if (entry.kind === 'error') {
                row.className = 'entry error';
                row.textContent = entry.message;
                if (entry.trace) {
                    const details = document.createElement('details');
                    const summary = document.createElement('summary');
                    summary.textContent = 'traceback';
                    const trace = document.createElement('div');
                    trace.className = 'trace';
                    trace.textContent = entry.trace;
                    details.appendChild(summary);
                    details.appendChild(trace);
                    row.appendChild(details);
                }
            } else if (entry.kind === 'cleared') {
                row.className = 'entry divider';
                row.textContent = 'console was cleared';
            }
            pane.appendChild(row);
            pane.scrollTop = pane.scrollHeight;
        }

        function renderValue(value) {
            if (value.tree) {
                const details = document.createElement('details');
                details.className = 'value composite';
                const summary = document.createElement('summary');
                summary.textContent = value.preview;
                details.appendChild(summary);
                details.appendChild(renderTree(value.tree));
                return details;
            }
            const span = document.createElement('span');
            span.className = 'value ' + value.class;
            if (value.class === 'boolean') {
                span.className += ' ' + value.preview;
            }
            span.textContent = value.preview;
            return span;
        }

        function renderTree(node) {
            const list = document.createElement('ul');
            list.className = 'tree';
            for (const child of node.children || []) {
                const item = document.createElement('li');
                const label = child.key + ': ' + child.text;
                if (child.children && child.children.length) {
                    const details = document.createElement('details');
                    const summary = document.createElement('summary');
                    summary.textContent = label;
                    details.appendChild(summary);
                    details.appendChild(renderTree(child));
                    item.appendChild(details);
                } else {
                    item.textContent = label;
                }
                list.appendChild(item);
            }
            return list;
        }

        function run() {
            if (ws && ws.readyState === WebSocket.OPEN) {
                ws.send(JSON.stringify({ type: 'run', code: editor.value }));
            }
        }

        editor.addEventListener('input', () => {
            clearTimeout(debounce);
            debounce = setTimeout(run, 400);
        });

        editor.addEventListener('keydown', (e) => {
            if (e.ctrlKey && e.key === 'Enter') {
                clearTimeout(debounce);
                run();
            }
        });

        document.getElementById('clear').addEventListener('click', () => {
            if (ws && ws.readyState === WebSocket.OPEN) {
                ws.send(JSON.stringify({ type: 'clear_console' }));
            }
        });

        // Start connection
        connect();
    </script>
</body>
</html>
"#;
