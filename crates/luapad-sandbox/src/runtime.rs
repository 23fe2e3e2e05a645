//! Fresh-state Lua execution with console interception.

use std::sync::Arc;

use async_trait::async_trait;
use luapad_core::{Executor, ExecutorError, OutputSink, RunHandle};
use mlua::{Lua, MultiValue};

use crate::convert;

/// Lua-backed execution sandbox.
///
/// Each run executes in a fresh, hardened Lua state: the injected
/// [`OutputSink`] is the only observable side channel, and no mutable state
/// survives between runs. A non-terminating run hangs its own worker
/// thread, never the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct LuaSandbox;

impl LuaSandbox {
    /// Create a new sandbox executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for LuaSandbox {
    async fn spawn(
        &self,
        code: String,
        sink: Arc<dyn OutputSink>,
    ) -> Result<RunHandle, ExecutorError> {
        let task = tokio::task::spawn_blocking(move || run_source(&code, &sink));
        Ok(RunHandle { task })
    }
}

/// Execute one source text to completion, reporting through the sink.
///
/// All failures - state setup, syntax errors, runtime errors - surface as a
/// single error event; nothing propagates to the caller, and output emitted
/// before a failure is preserved.
pub fn run_source(code: &str, sink: &Arc<dyn OutputSink>) {
    if let Err(e) = try_run(code, sink) {
        let (message, trace) = split_error(&e);
        sink.on_error(message, trace);
    }
}

fn try_run(code: &str, sink: &Arc<dyn OutputSink>) -> mlua::Result<()> {
    let lua = fresh_state(sink)?;
    lua.load(code).set_name("playground").exec()
}

/// Build a hardened Lua state with the console surface installed.
///
/// Keeps: basic, string, table, math, utf8. Removes everything that
/// reaches outside the state.
fn fresh_state(sink: &Arc<dyn OutputSink>) -> mlua::Result<Lua> {
    let lua = Lua::new();
    let globals = lua.globals();

    for name in [
        "os", "io", "debug", "package", "require", "load", "loadfile", "dofile",
    ] {
        globals.set(name, mlua::Value::Nil)?;
    }

    let console = lua.create_table()?;

    let log_sink = Arc::clone(sink);
    let log = lua.create_function(move |_, args: MultiValue| {
        let values = args.into_iter().map(|v| convert::marshal(&v)).collect();
        log_sink.on_output(values);
        Ok(())
    })?;
    console.set("log", log.clone())?;

    let error_sink = Arc::clone(sink);
    let error = lua.create_function(move |_, args: MultiValue| {
        let message = args
            .into_iter()
            .next()
            .map_or_else(|| "nil".to_string(), |v| describe(&v));
        error_sink.on_error(message, None);
        Ok(())
    })?;
    console.set("error", error)?;

    let clear_sink = Arc::clone(sink);
    let clear = lua.create_function(move |_, ()| {
        clear_sink.on_clear();
        Ok(())
    })?;
    console.set("clear", clear)?;

    globals.set("console", console)?;
    // print is an alias for console.log.
    globals.set("print", log)?;

    Ok(lua)
}

/// Single-line description of a value passed to `console.error`.
fn describe(value: &mlua::Value) -> String {
    match value {
        mlua::Value::String(s) => s
            .to_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| "<invalid utf8>".to_string()),
        mlua::Value::Nil => "nil".to_string(),
        mlua::Value::Boolean(b) => b.to_string(),
        mlua::Value::Integer(i) => i.to_string(),
        mlua::Value::Number(n) => n.to_string(),
        other => other.type_name().to_string(),
    }
}

/// Split an engine error into (message, traceback).
fn split_error(error: &mlua::Error) -> (String, Option<String>) {
    match error {
        mlua::Error::SyntaxError { message, .. } => (strip_chunk_prefix(message), None),
        mlua::Error::RuntimeError(msg) => match msg.split_once("\nstack traceback:") {
            Some((head, tail)) => (
                strip_chunk_prefix(head),
                Some(format!("stack traceback:{tail}")),
            ),
            None => (strip_chunk_prefix(msg), None),
        },
        mlua::Error::CallbackError { traceback, cause } => {
            let (message, _) = split_error(cause);
            (message, Some(traceback.clone()))
        }
        other => (other.to_string(), None),
    }
}

/// Strip the `[string "playground"]:1: ` location prefix the engine puts
/// in front of chunk errors.
fn strip_chunk_prefix(message: &str) -> String {
    let msg = message.trim();
    if let Some(rest) = msg.strip_prefix("[string ") {
        if let Some(idx) = rest.find("]:") {
            let after = &rest[idx + 2..];
            if let Some(colon) = after.find(": ") {
                return after[colon + 2..].to_string();
            }
        }
    }
    msg.to_string()
}
