use crate::error::{JoinError, JoinResult};
use crate::models::{Contact, ContactPatch, Credentials, Registration, Task, TaskPatch, User};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;

const TASK_ENDPOINT: &str = "task/";
const CONTACT_ENDPOINT: &str = "contact/";
const LOGIN_ENDPOINT: &str = "auth/login/";
const REGISTRATION_ENDPOINT: &str = "auth/registration/";
const LOGOUT_ENDPOINT: &str = "auth/logout/";

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> JoinResult<Vec<Task>>;
    async fn get_task(&self, id: u64) -> JoinResult<Task>;
    async fn create_task(&self, task: &Task) -> JoinResult<Task>;
    async fn patch_task(&self, id: u64, patch: &TaskPatch) -> JoinResult<Task>;
    async fn delete_task(&self, id: u64) -> JoinResult<()>;
}

#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn list_contacts(&self) -> JoinResult<Vec<Contact>>;
    async fn create_contact(&self, contact: &Contact) -> JoinResult<Contact>;
    async fn patch_contact(&self, id: u64, patch: &ContactPatch) -> JoinResult<Contact>;
    async fn delete_contact(&self, id: u64) -> JoinResult<()>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> JoinResult<User>;
    async fn register(&self, registration: &Registration<'_>) -> JoinResult<User>;
    async fn logout(&self) -> JoinResult<()>;
    /// Token sent as `Authorization: Token ...` on every later request.
    fn set_token(&self, token: Option<String>);
}

/// HTTP client for the Join REST API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// `base_url` is the versioned API root, e.g. `http://localhost:8000/api/v1/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("event=http_request method={} url={}", method, url);
        let builder = self.client.request(method, url);
        let token = self
            .token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match token {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }
}

async fn check(res: Response) -> JoinResult<Response> {
    if res.status().is_success() {
        Ok(res)
    } else {
        let status = res.status().as_u16();
        let body = res.text().await?;
        warn!("event=http_error status={} body={}", status, body);
        Err(JoinError::Status { status, body })
    }
}

async fn json<T: DeserializeOwned>(res: Response) -> JoinResult<T> {
    Ok(check(res).await?.json::<T>().await?)
}

fn detail(kind: &str, id: u64) -> String {
    format!("{}{}/", kind, id)
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn list_tasks(&self) -> JoinResult<Vec<Task>> {
        let res = self.request(Method::GET, TASK_ENDPOINT).send().await?;
        json(res).await
    }

    async fn get_task(&self, id: u64) -> JoinResult<Task> {
        let res = self
            .request(Method::GET, &detail(TASK_ENDPOINT, id))
            .send()
            .await?;
        json(res).await
    }

    async fn create_task(&self, task: &Task) -> JoinResult<Task> {
        let res = self
            .request(Method::POST, TASK_ENDPOINT)
            .json(task)
            .send()
            .await?;
        json(res).await
    }

    async fn patch_task(&self, id: u64, patch: &TaskPatch) -> JoinResult<Task> {
        let res = self
            .request(Method::PATCH, &detail(TASK_ENDPOINT, id))
            .json(patch)
            .send()
            .await?;
        json(res).await
    }

    async fn delete_task(&self, id: u64) -> JoinResult<()> {
        let res = self
            .request(Method::DELETE, &detail(TASK_ENDPOINT, id))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactApi for ApiClient {
    async fn list_contacts(&self) -> JoinResult<Vec<Contact>> {
        let res = self.request(Method::GET, CONTACT_ENDPOINT).send().await?;
        json(res).await
    }

    async fn create_contact(&self, contact: &Contact) -> JoinResult<Contact> {
        let res = self
            .request(Method::POST, CONTACT_ENDPOINT)
            .json(contact)
            .send()
            .await?;
        json(res).await
    }

    async fn patch_contact(&self, id: u64, patch: &ContactPatch) -> JoinResult<Contact> {
        let res = self
            .request(Method::PATCH, &detail(CONTACT_ENDPOINT, id))
            .json(patch)
            .send()
            .await?;
        json(res).await
    }

    async fn delete_contact(&self, id: u64) -> JoinResult<()> {
        let res = self
            .request(Method::DELETE, &detail(CONTACT_ENDPOINT, id))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> JoinResult<User> {
        // Accounts are created with the email as username.
        let credentials = Credentials {
            username: email,
            password,
        };
        let res = self
            .request(Method::POST, LOGIN_ENDPOINT)
            .json(&credentials)
            .send()
            .await?;
        json(res).await
    }

    async fn register(&self, registration: &Registration<'_>) -> JoinResult<User> {
        let res = self
            .request(Method::POST, REGISTRATION_ENDPOINT)
            .json(registration)
            .send()
            .await?;
        json(res).await
    }

    async fn logout(&self) -> JoinResult<()> {
        let res = self.request(Method::POST, LOGOUT_ENDPOINT).send().await?;
        check(res).await?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_paths_end_with_slash() {
        assert_eq!(detail(TASK_ENDPOINT, 12), "task/12/");
        assert_eq!(detail(CONTACT_ENDPOINT, 3), "contact/3/");
    }

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let client = ApiClient::new("http://localhost:8000/api/v1/");
        assert_eq!(
            client.url(LOGIN_ENDPOINT),
            "http://localhost:8000/api/v1/auth/login/"
        );
    }

    #[test]
    fn test_token_header_is_set_after_login() {
        let client = ApiClient::new("http://localhost:8000/api/v1/");
        let anonymous = client.request(Method::GET, TASK_ENDPOINT).build().unwrap();
        assert!(anonymous.headers().get("Authorization").is_none());

        client.set_token(Some("abc123".to_string()));
        let request = client.request(Method::GET, TASK_ENDPOINT).build().unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Token abc123"
        );

        client.set_token(None);
        let request = client.request(Method::GET, TASK_ENDPOINT).build().unwrap();
        assert!(request.headers().get("Authorization").is_none());
    }
}
