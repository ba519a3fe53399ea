//! Posting workflow endpoints.
//!
//! Every workflow action gets one route. GET runs the display path and POST
//! the submit path with a form-encoded body. Rendered views are returned as
//! JSON; successful mutations answer `303 See Other` pointing at the route
//! of the next action.

use std::collections::HashMap;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, MethodRouter},
    Form, Json, Router,
};
use estagios_vagas::{Action, PostingId, Request, Transition, View, EMPTY_STATE};
use serde_json::Value;
use tracing::{debug, error};

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::state::AppState;

/// Form key carrying the target posting id.
pub const ID_FIELD: &str = "id";

/// Route serving `action`.
pub fn path(action: Action) -> &'static str {
    match action {
        Action::Index => "/",
        Action::List => "/read",
        Action::Create => "/create",
        Action::SelectForUpdate => "/update",
        Action::ConfirmUpdate => "/confirm_update",
        Action::Delete => "/delete",
    }
}

/// Create posting routes.
pub fn routes() -> Router<AppState> {
    Action::ALL
        .into_iter()
        .fold(Router::new(), |router, action| {
            router.route(path(action), action_route(action))
        })
}

fn action_route(action: Action) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>, ctx: RequestContext| async move {
        run(state, ctx, Request::display(action)).await
    })
    .post(
        move |State(state): State<AppState>,
              ctx: RequestContext,
              form: Result<Form<HashMap<String, String>>, FormRejection>| async move {
            match form {
                Ok(Form(fields)) => run(state, ctx, submit_request(action, fields)).await,
                Err(rejection) => Err(ApiError::bad_request("invalid_form", rejection.body_text())
                    .with_request_id(ctx.request_id)),
            }
        },
    )
}

/// Split a submitted form into the posting id and the field submission.
///
/// An id that is not an integer is treated as absent.
fn submit_request(action: Action, mut fields: HashMap<String, String>) -> Request {
    let id = fields
        .remove(ID_FIELD)
        .and_then(|raw| match raw.parse::<PostingId>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(raw_id = %raw, "Ignoring unparsable posting id");
                None
            }
        });

    let request = Request::submit(action).with_submission(fields.into_iter().collect());
    match id {
        Some(id) => request.with_id(id),
        None => request,
    }
}

async fn run(state: AppState, ctx: RequestContext, request: Request) -> Result<Response, ApiError> {
    let action = request.action;

    let outcome = tokio::task::spawn_blocking(move || {
        state.with_controller(|controller| controller.handle(request))
    })
    .await
    .map_err(|e| {
        error!(error = %e, request_id = %ctx.request_id, action = %action, "Workflow task failed");
        ApiError::internal("internal_error", "Failed to handle request")
            .with_request_id(ctx.request_id.clone())
    })?;

    let transition = outcome.map_err(|e| {
        error!(error = %e, request_id = %ctx.request_id, action = %action, "Posting store failure");
        ApiError::internal("store_unavailable", "Posting store is unavailable")
            .with_request_id(ctx.request_id.clone())
    })?;

    match transition {
        Transition::Render(view) => render(&view, &ctx),
        Transition::Redirect(target) => {
            debug!(request_id = %ctx.request_id, from = %action, to = %target, "Redirecting");
            Ok(Redirect::to(path(target)).into_response())
        }
    }
}

fn render(view: &View, ctx: &RequestContext) -> Result<Response, ApiError> {
    let mut body = serde_json::to_value(view).map_err(|e| {
        error!(error = %e, request_id = %ctx.request_id, view = view.name(), "Failed to serialize view");
        ApiError::internal("internal_error", "Failed to render view")
            .with_request_id(ctx.request_id.clone())
    })?;

    if view.is_empty_state() {
        if let Value::Object(map) = &mut body {
            map.insert("empty_state".to_string(), Value::from(EMPTY_STATE));
        }
    }

    Ok((StatusCode::OK, Json(body)).into_response())
}
