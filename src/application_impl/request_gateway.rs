use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use nanoid::nanoid;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// One backend call before authentication is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    pub fn query_opt<T: fmt::Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The only way the client reaches the backend.
///
/// The access token is read from the session store when the call is made,
/// never captured earlier. A 401 is reported to the caller; the session is
/// left untouched and nothing is retried here.
pub struct RequestGateway {
    session_store: Arc<dyn SessionStore>,
    transport: Arc<dyn HttpTransport>,
}

impl RequestGateway {
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> RequestGateway {
        RequestGateway {
            session_store,
            transport,
        }
    }

    /// Sends the request and decodes the envelope of a 2xx answer.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<T>, ApiError> {
        let request_id = nanoid!(8);
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;

        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if body.is_some() {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        if let Some(token) = self.session_store.access_token() {
            headers.push(("Authorization".to_owned(), format!("Bearer {}", token.0)));
        }

        let started = Instant::now();
        let response = self
            .transport
            .send(HttpRequest {
                method,
                path: path.clone(),
                query,
                headers,
                body,
            })
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(%request_id, %method, %path, elapsed_ms, "no response: {}", e);
                return Err(e.into());
            }
        };

        if !(200..300).contains(&response.status) {
            let (code, message) = serde_json::from_str::<Envelope<Untyped>>(&response.body)
                .map(|envelope| (envelope.code, envelope.message))
                .unwrap_or_default();
            warn!(
                %request_id, %method, %path, status = response.status, elapsed_ms, %code,
                "request failed"
            );
            return Err(ApiError::from_status(response.status, code, message));
        }

        info!(%request_id, %method, %path, status = response.status, elapsed_ms, "request done");

        if response.body.trim().is_empty() {
            return Ok(Envelope {
                is_success: true,
                code: String::new(),
                message: String::new(),
                result: None,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| {
            warn!(%request_id, %path, "undecodable body: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    /// Sends the request and returns the envelope's result.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let envelope = Self::accepted(self.send::<T>(request).await?)?;
        envelope
            .result
            .ok_or_else(|| ApiError::Decode("missing result".to_owned()))
    }

    /// Sends the request where only success matters.
    pub async fn call_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        Self::accepted(self.send::<Untyped>(request).await?)?;
        Ok(())
    }

    fn accepted<T>(envelope: Envelope<T>) -> Result<Envelope<T>, ApiError> {
        if envelope.is_success {
            Ok(envelope)
        } else {
            Err(ApiError::Rejected {
                code: envelope.code,
                message: envelope.message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::InMemorySessionStore;
    use crate::infra::FakeTransport;

    fn gateway() -> (Arc<InMemorySessionStore>, Arc<FakeTransport>, RequestGateway) {
        let session = Arc::new(InMemorySessionStore::new(vec![]));
        let transport = Arc::new(FakeTransport::new());
        let gateway = RequestGateway::new(session.clone(), transport.clone());
        (session, transport, gateway)
    }

    #[tokio::test]
    async fn bearer_header_tracks_current_token() {
        let (session, transport, gateway) = gateway();
        transport.respond_ok("/a", Envelope::ok(1u32));

        let _: u32 = gateway.call(ApiRequest::get("/a")).await.unwrap();
        session.login(AuthTokens::new("tok-1", "r"));
        let _: u32 = gateway.call(ApiRequest::get("/a")).await.unwrap();
        session.set_access_token(AccessToken("tok-2".into()));
        let _: u32 = gateway.call(ApiRequest::get("/a")).await.unwrap();

        let auth: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r.header("authorization").map(str::to_owned))
            .collect();
        assert_eq!(
            auth,
            vec![None, Some("Bearer tok-1".into()), Some("Bearer tok-2".into())]
        );
    }

    #[tokio::test]
    async fn unauthorized_leaves_session_alone() {
        let (session, transport, gateway) = gateway();
        session.login(AuthTokens::new("expired", "r"));
        transport.respond(
            "/me",
            401,
            r#"{"isSuccess":false,"code":"AUTH401","message":"expired"}"#,
        );

        let err = gateway.call::<MyInfo>(ApiRequest::get("/me")).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Auth {
                code: "AUTH401".into(),
                message: "expired".into()
            }
        );
        assert!(session.is_logged_in());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let (_, transport, gateway) = gateway();
        transport.respond(
            "/x",
            200,
            r#"{"isSuccess":false,"code":"ROUTINE4001","message":"full"}"#,
        );

        let err = gateway.call_unit(ApiRequest::post("/x")).await.unwrap_err();
        assert_eq!(err.code(), Some("ROUTINE4001"));
    }

    #[tokio::test]
    async fn query_and_body_reach_transport() {
        let (_, transport, gateway) = gateway();
        transport.respond("/list", 200, "");

        let request = ApiRequest::post("/list")
            .query("date", "2025-01-01")
            .query_opt("page", None::<u32>)
            .json(&SurveyRequest {
                survey_list: vec![true, false],
            })
            .unwrap();
        gateway.call_unit(request).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.query, vec![("date".to_owned(), "2025-01-01".to_owned())]);
        assert_eq!(
            sent.body,
            Some(serde_json::json!({ "surveyList": [true, false] }))
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let (_, transport, gateway) = gateway();
        transport.respond("/n", 200, "<html>");

        let err = gateway.call::<u32>(ApiRequest::get("/n")).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failures_map_to_network_and_timeout() {
        let (_, transport, gateway) = gateway();
        transport.fail("/slow", TransportError::Timeout);

        let err = gateway.call_unit(ApiRequest::get("/slow")).await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);

        let err = gateway.call_unit(ApiRequest::get("/unscripted")).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
