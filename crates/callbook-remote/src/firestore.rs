use crate::auth::Session;

pub const BACKEND_NAME: &str = "firestore";
pub const DEFAULT_COLLECTION: &str = "calls";
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub collection: String,
    /// Overrides [`DEFAULT_ENDPOINT`], e.g. for a local emulator.
    pub endpoint: Option<String>,
}

impl FirestoreSettings {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            endpoint: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

#[cfg(feature = "firestore")]
mod imp {
    use super::{FirestoreSettings, Session, BACKEND_NAME};
    use crate::error::RemoteError;
    use crate::wire::{self, CommitResponse, RunQueryItem, WireDocument};
    use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
    use callbook_store::{DocumentBackend, Precondition, SortDirection, StoreError};
    use reqwest::blocking::{Client, RequestBuilder, Response};
    use reqwest::StatusCode;
    use std::time::Duration;
    use tracing::debug;
    use url::Url;
    use uuid::Uuid;

    type StoreResult<T> = callbook_store::Result<T>;

    /// Remote document store over the Firestore REST API.
    pub struct FirestoreBackend {
        client: Client,
        settings: FirestoreSettings,
        documents_url: Url,
        id_token: String,
    }

    impl FirestoreBackend {
        pub fn connect(settings: FirestoreSettings, session: &Session) -> crate::Result<Self> {
            let project = settings.project_id.trim();
            if project.is_empty() {
                return Err(RemoteError::Unavailable(
                    "firestore project id is empty".to_string(),
                ));
            }
            let mut documents_url = Url::parse(settings.endpoint())?;
            documents_url
                .path_segments_mut()
                .map_err(|_| {
                    RemoteError::Unavailable(format!(
                        "firestore endpoint cannot be a base: {}",
                        settings.endpoint()
                    ))
                })?
                .pop_if_empty()
                .extend(["projects", project, "databases", "(default)", "documents"]);

            let client = Client::builder()
                .user_agent("callbook")
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            debug!(project = project, collection = %settings.collection, "firestore backend ready");
            Ok(Self {
                client,
                settings,
                documents_url,
                id_token: session.id_token.clone(),
            })
        }

        fn document_url(&self, id: &CallId) -> StoreResult<Url> {
            let mut url = self.documents_url.clone();
            url.path_segments_mut()
                .map_err(|_| StoreError::unavailable(BACKEND_NAME, "invalid documents url"))?
                .extend([self.settings.collection.as_str(), id.as_str()]);
            Ok(url)
        }

        // `documents:commit` and `documents:runQuery` are verbs on the
        // documents resource, not child paths.
        fn action_url(&self, action: &str) -> StoreResult<Url> {
            let mut url = self.documents_url.clone();
            let path = format!("{}:{}", url.path(), action);
            url.set_path(&path);
            Ok(url)
        }

        fn send(&self, request: RequestBuilder, id: Option<&CallId>) -> StoreResult<Response> {
            let response = request
                .bearer_auth(&self.id_token)
                .send()
                .map_err(|err| StoreError::from(RemoteError::from(err)))?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }
            let body = response.text().unwrap_or_default();
            Err(wire::classify_error(status.as_u16(), &body, id))
        }

        fn commit(&self, request: &wire::CommitRequest, id: &CallId) -> StoreResult<CommitResponse> {
            let url = self.action_url("commit")?;
            let response = self.send(self.client.post(url).json(request), Some(id))?;
            read_json(response)
        }

        fn project(&self) -> &str {
            self.settings.project_id.trim()
        }
    }

    impl DocumentBackend for FirestoreBackend {
        fn backend_name(&self) -> &'static str {
            BACKEND_NAME
        }

        fn insert(&self, fields: &CallFields) -> StoreResult<CallRecord> {
            let id = CallId::new(Uuid::new_v4().simple().to_string())
                .map_err(|_| StoreError::Schema("generated an empty id".to_string()))?;
            let request =
                wire::create_request(self.project(), &self.settings.collection, &id, fields);
            let response = self.commit(&request, &id)?;
            Ok(wire::record_from_create(response, id, fields)?)
        }

        fn fetch(&self, id: &CallId) -> StoreResult<Option<CallRecord>> {
            let url = self.document_url(id)?;
            let response = match self.send(self.client.get(url), Some(id)) {
                Ok(response) => response,
                Err(StoreError::NotFound(_)) => return Ok(None),
                Err(err) => return Err(err),
            };
            let document: WireDocument = read_json(response)?;
            wire::record_from_document(document).map(Some)
        }

        fn list(&self, direction: SortDirection) -> StoreResult<Vec<CallRecord>> {
            let url = self.action_url("runQuery")?;
            let body = wire::list_query(&self.settings.collection, direction);
            let response = self.send(self.client.post(url).json(&body), None)?;
            let items: Vec<RunQueryItem> = read_json(response)?;
            wire::records_from_query(items)
        }

        fn update(
            &self,
            id: &CallId,
            patch: &FieldPatch,
            precondition: &Precondition,
        ) -> StoreResult<Revision> {
            let request = wire::update_request(
                self.project(),
                &self.settings.collection,
                id,
                patch,
                precondition,
            );
            let response = self.commit(&request, id)?;
            Ok(wire::revision_from_update(response)?)
        }

        fn delete(&self, id: &CallId) -> StoreResult<()> {
            let url = self.document_url(id)?;
            let response = self
                .client
                .delete(url)
                .bearer_auth(&self.id_token)
                .send()
                .map_err(|err| StoreError::from(RemoteError::from(err)))?;
            let status = response.status();
            if status.is_success() || status == StatusCode::NOT_FOUND {
                return Ok(());
            }
            let body = response.text().unwrap_or_default();
            Err(wire::classify_error(status.as_u16(), &body, None))
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> StoreResult<T> {
        let body = response
            .text()
            .map_err(|err| StoreError::from(RemoteError::from(err)))?;
        serde_json::from_str(&body).map_err(|err| StoreError::from(RemoteError::from(err)))
    }
}

#[cfg(not(feature = "firestore"))]
mod imp {
    use super::{FirestoreSettings, Session};
    use crate::error::RemoteError;
    use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
    use callbook_store::{DocumentBackend, Precondition, SortDirection};

    type StoreResult<T> = callbook_store::Result<T>;

    pub struct FirestoreBackend {
        _private: (),
    }

    impl FirestoreBackend {
        pub fn connect(_settings: FirestoreSettings, _session: &Session) -> crate::Result<Self> {
            Err(disabled())
        }
    }

    impl DocumentBackend for FirestoreBackend {
        fn backend_name(&self) -> &'static str {
            super::BACKEND_NAME
        }

        fn insert(&self, _fields: &CallFields) -> StoreResult<CallRecord> {
            Err(disabled().into())
        }

        fn fetch(&self, _id: &CallId) -> StoreResult<Option<CallRecord>> {
            Err(disabled().into())
        }

        fn list(&self, _direction: SortDirection) -> StoreResult<Vec<CallRecord>> {
            Err(disabled().into())
        }

        fn update(
            &self,
            _id: &CallId,
            _patch: &FieldPatch,
            _precondition: &Precondition,
        ) -> StoreResult<Revision> {
            Err(disabled().into())
        }

        fn delete(&self, _id: &CallId) -> StoreResult<()> {
            Err(disabled().into())
        }
    }

    fn disabled() -> RemoteError {
        RemoteError::Unavailable(
            "firestore support not enabled (build with feature firestore)".to_string(),
        )
    }
}

pub use imp::FirestoreBackend;

#[cfg(test)]
mod tests {
    use super::{FirestoreSettings, DEFAULT_COLLECTION, DEFAULT_ENDPOINT};

    #[test]
    fn settings_default_to_hosted_endpoint_and_calls_collection() {
        let settings = FirestoreSettings::new("demo");
        assert_eq!(settings.collection, DEFAULT_COLLECTION);
        assert_eq!(settings.endpoint(), DEFAULT_ENDPOINT);

        let settings = FirestoreSettings {
            endpoint: Some("http://localhost:8080/v1".to_string()),
            ..settings
        };
        assert_eq!(settings.endpoint(), "http://localhost:8080/v1");
    }

    #[cfg(not(feature = "firestore"))]
    #[test]
    fn connect_reports_disabled_feature() {
        use crate::auth::Session;
        let session = Session {
            id_token: "t".to_string(),
            email: "agent@gmail.com".to_string(),
            local_id: "uid".to_string(),
        };
        let err = super::FirestoreBackend::connect(FirestoreSettings::new("demo"), &session)
            .err()
            .expect("disabled");
        assert!(err.to_string().contains("not enabled"));
    }
}
