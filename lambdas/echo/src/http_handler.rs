use gateway_responses::{ApiGatewayResponse, Responder, SerializationError};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{tracing, Error, IntoResponse, Request, Response};
use serde_json::Value;

pub(crate) struct HandlerDeps {
    pub responder: Responder,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler(
    deps: &HandlerDeps,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    tracing::info!("Received event: {:?}", event);

    let response = if event.method() == Method::POST {
        echo_body(&deps.responder, event.body().as_ref())?
    } else if event.method() == Method::DELETE {
        deps.responder.forbidden(None, None)
    } else {
        deps.responder.not_found(None, None)
    };

    let response = Response::<String>::try_from(response).map_err(Box::new)?;
    Ok(response)
}

fn echo_body(responder: &Responder, body: &[u8]) -> Result<ApiGatewayResponse, SerializationError> {
    if body.is_empty() {
        return Ok(responder.bad_request(Some("request body is required"), None));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(payload) => responder.respond_with(StatusCode::OK, &payload, None),
        Err(e) => {
            tracing::warn!("Request body is not valid JSON: {:?}", e);
            Ok(responder.bad_request(Some("request body must be valid JSON"), None))
        }
    }
}
