use crate::Lobby;
use df_cards::Catalog;
use df_core::ID;
use df_gameroom::ClientMessage;
use df_gameroom::Command;
use df_gameroom::Participant;
use df_gameroom::ParticipantId;
use df_gameroom::RoomError;
use df_gameroom::RoomHandle;
use df_gameroom::ServerMessage;
use df_gameroom::Session;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

const MAX_CODE_LENGTH: usize = 12;
const MAX_NAME_LENGTH: usize = 32;

/// Session codes are short uppercase join keys; anything join-shaped is
/// accepted since unknown codes open fresh sessions.
fn session_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    match code.len() {
        1..=MAX_CODE_LENGTH if code.chars().all(|c| c.is_ascii_alphanumeric()) => Some(code),
        _ => None,
    }
}

fn identity(query: &HashMap<String, String>) -> Option<ParticipantId> {
    query
        .get("user")
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .map(ID::from)
}

fn display_name(query: &HashMap<String, String>) -> String {
    query
        .get("name")
        .map(|raw| raw.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.chars().take(MAX_NAME_LENGTH).collect())
        .unwrap_or_else(|| "Anonymous".to_string())
}

pub async fn ws(
    lobby: web::Data<Lobby>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let Some(code) = session_code(&path.into_inner()) else {
        return HttpResponse::BadRequest()
            .body("malformed session code")
            .map_into_right_body();
    };
    let id = identity(&query).unwrap_or_default();
    let participant = Participant::new(id, display_name(&query));
    let handle = lobby.into_inner().room(&code, participant.clone()).await;
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match bridge(handle, code, participant, session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::NotFound()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

/// Spawns the WebSocket pump between one client and its session actor.
///
/// Pongs short-circuit here through the shared [`Notify`] rather than the
/// mailbox: a liveness probe blocks the coordinator, so the answer must
/// not need the coordinator to be processed.
async fn bridge(
    handle: RoomHandle,
    code: String,
    participant: Participant,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) -> anyhow::Result<()> {
    let (channel, mut rx) = mpsc::channel::<ServerMessage>(64);
    let pong = Arc::new(Notify::new());
    let (ack, claimed) = oneshot::channel();
    handle
        .tx
        .send(Command::Join {
            participant,
            channel,
            pong: pong.clone(),
            ack,
        })
        .await
        .map_err(|_| anyhow::anyhow!("session is closed"))?;
    let id = claimed
        .await
        .map_err(|_| anyhow::anyhow!("session went away"))??;
    log::debug!("[bridge {}] {} connected", code, id);
    actix_web::rt::spawn(async move {
        'sesh: loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(message) => if session.text(message.to_json()).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Pong) => pong.notify_one(),
                        Ok(message) => {
                            let (ack, _) = oneshot::channel();
                            if handle.tx.send(Command::Call { id, message, ack }).await.is_err() { break 'sesh }
                        }
                        Err(e) => {
                            let refusal = RoomError::protocol(format!("unreadable message: {}", e));
                            if session.text(ServerMessage::nack(&code, refusal.payload()).to_json()).await.is_err() { break 'sesh }
                        }
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        let _ = handle.tx.send(Command::Disconnect { id }).await;
        log::debug!("[bridge {}] {} disconnected", code, id);
    });
    Ok(())
}

pub async fn draftlog(
    lobby: web::Data<Lobby>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(code) = session_code(&path.into_inner()) else {
        return HttpResponse::BadRequest().body("malformed session code");
    };
    let Some(handle) = lobby.peek(&code).await else {
        return HttpResponse::NotFound().body("no such session");
    };
    let (ack, answer) = oneshot::channel();
    let command = Command::Log {
        id: identity(&query),
        ack,
    };
    if handle.tx.send(command).await.is_err() {
        return HttpResponse::NotFound().body("no such session");
    }
    match answer.await {
        Ok(Ok(log)) => HttpResponse::Ok().json(log),
        Ok(Err(e @ RoomError::Resource { .. })) => HttpResponse::NotFound().body(e.to_string()),
        Ok(Err(e @ RoomError::Protocol { .. })) => HttpResponse::Forbidden().body(e.to_string()),
        Ok(Err(e)) => HttpResponse::InternalServerError().body(e.to_string()),
        Err(_) => HttpResponse::InternalServerError().body("session went away"),
    }
}

pub async fn export(
    lobby: web::Data<Lobby>,
    catalog: web::Data<Arc<Catalog>>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(code) = session_code(&path.into_inner()) else {
        return HttpResponse::BadRequest().body("malformed session code");
    };
    let Some(id) = identity(&query) else {
        return HttpResponse::BadRequest().body("user query parameter required");
    };
    let Some(handle) = lobby.peek(&code).await else {
        return HttpResponse::NotFound().body("no such session");
    };
    let (ack, answer) = oneshot::channel();
    if handle.tx.send(Command::Export { id, ack }).await.is_err() {
        return HttpResponse::NotFound().body("no such session");
    }
    let picks = match answer.await {
        Ok(Ok(picks)) => picks,
        Ok(Err(e)) => return HttpResponse::NotFound().body(e.to_string()),
        Err(_) => return HttpResponse::InternalServerError().body("session went away"),
    };
    match query.get("format").map(String::as_str) {
        Some("text") => {
            let mut counts = Vec::<(df_cards::CardId, usize)>::new();
            for pick in picks {
                match counts.iter_mut().find(|(id, _)| *id == pick) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((pick, 1)),
                }
            }
            let lines: Vec<String> = counts
                .iter()
                .filter_map(|(id, n)| catalog.get(*id).map(|card| format!("{} {}", n, card)))
                .collect();
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(lines.join("\n"))
        }
        _ => {
            let cards: Vec<_> = picks.iter().filter_map(|id| catalog.get(*id)).collect();
            HttpResponse::Ok().json(serde_json::json!({ "code": code, "cards": cards }))
        }
    }
}

/// Operator endpoints answer only when the path key matches ADMIN_KEY.
fn authorized(key: &str) -> bool {
    std::env::var("ADMIN_KEY")
        .map(|secret| !secret.is_empty() && secret == key)
        .unwrap_or(false)
}

pub async fn status(lobby: web::Data<Lobby>, path: web::Path<String>) -> impl Responder {
    if !authorized(&path.into_inner()) {
        return HttpResponse::Unauthorized().finish();
    }
    let codes = lobby.codes().await;
    HttpResponse::Ok().json(serde_json::json!({
        "sessions": codes.len(),
        "codes": codes,
    }))
}

pub async fn sessions(lobby: web::Data<Lobby>, path: web::Path<String>) -> impl Responder {
    if !authorized(&path.into_inner()) {
        return HttpResponse::Unauthorized().finish();
    }
    let mut snapshots = Vec::<Session>::new();
    for (_, handle) in lobby.handles().await {
        let (ack, answer) = oneshot::channel();
        if handle.tx.send(Command::Snapshot { ack }).await.is_ok() {
            if let Ok(session) = answer.await {
                snapshots.push(session);
            }
        }
    }
    HttpResponse::Ok().json(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized_and_bounded() {
        assert_eq!(session_code("  abcd1234 "), Some("ABCD1234".to_string()));
        assert_eq!(session_code(""), None);
        assert_eq!(session_code("has spaces"), None);
        assert_eq!(session_code("WAYTOOLONGFORACODE"), None);
    }

    #[test]
    fn names_default_and_truncate() {
        let mut query = HashMap::new();
        assert_eq!(display_name(&query), "Anonymous");
        query.insert("name".to_string(), "  ".to_string());
        assert_eq!(display_name(&query), "Anonymous");
        query.insert("name".to_string(), "x".repeat(100));
        assert_eq!(display_name(&query).len(), MAX_NAME_LENGTH);
    }
}
