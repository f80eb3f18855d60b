//! S-expression control messages for a running session.
//!
//! Same message shape as the compositor IPC: a plist with `:type` and an
//! optional `:id`, answered with `(:type :response :id N :status ...)`.
//! Transport is left to the embedding application.

use lexpr::Value;
use tracing::warn;

use crate::session::{GlyphMetrics, Session};
use crate::sexp::{error_response, get_int, get_keyword, ok_response};

/// Parse a control message and apply it to `session`.  Always returns a reply.
pub fn handle_message<M: GlyphMetrics>(session: &mut Session<M>, raw: &str) -> String {
    let value = match lexpr::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("malformed control message: {}", e);
            return error_response(0, &format!("malformed s-expression: {e}"));
        }
    };

    let msg_id = get_int(&value, "id").unwrap_or(0);

    match get_keyword(&value, "type").as_deref() {
        Some("status") => handle_status(session, msg_id),
        Some("config") => handle_config(session, msg_id),
        Some("configure") => handle_configure(session, msg_id, &value),
        Some("advance") => handle_advance(session, msg_id),
        Some("reset") => {
            session.reset();
            ok_response(msg_id)
        }
        Some("stop") => {
            session.stop();
            ok_response(msg_id)
        }
        Some("start") => {
            session.start();
            ok_response(msg_id)
        }
        Some(other) => error_response(msg_id, &format!("unknown message type: {other}")),
        None => error_response(msg_id, "missing :type"),
    }
}

fn handle_status<M: GlyphMetrics>(session: &Session<M>, msg_id: i64) -> String {
    format!(
        "(:type :response :id {} :status :ok :session {})",
        msg_id,
        session.status_sexp()
    )
}

fn handle_config<M: GlyphMetrics>(session: &Session<M>, msg_id: i64) -> String {
    format!(
        "(:type :response :id {} :status :ok :config {})",
        msg_id,
        session.config().config_sexp()
    )
}

fn handle_configure<M: GlyphMetrics>(session: &mut Session<M>, msg_id: i64, value: &Value) -> String {
    let mut next = session.config().clone();
    if let Err(e) = next.apply_plist(value) {
        return error_response(msg_id, &e.to_string());
    }
    match session.reconfigure(next) {
        Ok(()) => handle_config(session, msg_id),
        Err(e) => error_response(msg_id, &e.to_string()),
    }
}

fn handle_advance<M: GlyphMetrics>(session: &mut Session<M>, msg_id: i64) -> String {
    let state = session.advance();
    format!(
        "(:type :response :id {} :status :ok :cursor {})",
        msg_id,
        state.to_sexp()
    )
}

// ── Tests ──────────────────────────────────────────────────
