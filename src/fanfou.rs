// fanfou.rs
// Distributed under terms of the MIT license.
// Fanfou API doc: https://github.com/FanfouAPI/FanFouAPIDoc/wiki

use crate::error::NofanError;
use crate::store::{Config, Credential};
use crate::utils::from_asctime;
use chrono::{DateTime, FixedOffset};
use reqwest;
use reqwest_oauth1::{OAuthClientProvider, Secrets, TokenReaderFuture};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

#[derive(Debug, Clone)]
pub struct Fanfou {
    consumer_key: String,
    consumer_secret: String,
    oauth_token: Option<(String, String)>,
    ssl: bool,
    api_domain: String,
    oauth_domain: String,
}

#[derive(Deserialize, Debug, Clone)]
#[allow(dead_code)]
pub struct User {
    pub id: String,
    pub name: String,
    pub screen_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[allow(dead_code)]
pub struct Photo {
    pub largeurl: String,
    pub imageurl: Option<String>,
    pub thumburl: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Status {
    pub id: String,
    #[serde(deserialize_with = "from_asctime")]
    pub created_at: DateTime<FixedOffset>,
    pub text: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub photo: Option<Photo>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Trend {
    pub name: String,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TrendList {
    #[serde(default)]
    pub trends: Vec<Trend>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl Fanfou {
    pub fn new(config: &Config, credential: &Credential) -> Self {
        Fanfou {
            consumer_key: credential.consumer_key.clone(),
            consumer_secret: credential.consumer_secret.clone(),
            oauth_token: Some((
                credential.oauth_token.clone(),
                credential.oauth_token_secret.clone(),
            )),
            ssl: config.ssl,
            api_domain: config.api_domain.clone(),
            oauth_domain: config.oauth_domain.clone(),
        }
    }

    // Consumer-only client, for the xauth token exchange.
    pub fn anonymous(config: &Config) -> Self {
        Fanfou {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            oauth_token: None,
            ssl: config.ssl,
            api_domain: config.api_domain.clone(),
            oauth_domain: config.oauth_domain.clone(),
        }
    }

    fn scheme(&self) -> &'static str {
        if self.ssl {
            "https"
        } else {
            "http"
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}://{}{}.json", self.scheme(), self.api_domain, path)
    }

    fn to_secrets(&self) -> Secrets {
        match &self.oauth_token {
            Some((token, secret)) => {
                Secrets::new(self.consumer_key.clone(), self.consumer_secret.clone())
                    .token(token.clone(), secret.clone())
            }
            None => Secrets::new(self.consumer_key.clone(), self.consumer_secret.clone()),
        }
    }

    pub async fn get<T>(&self, path: &str, query: &T) -> Result<reqwest::Response, NofanError>
    where
        T: Serialize + ?Sized + Clone,
    {
        let secrets = self.to_secrets();
        let resp = reqwest::Client::new()
            .oauth1(secrets)
            .get(self.api_url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| NofanError::OauthError(e))?;
        Self::check(resp).await
    }

    pub async fn post<T>(&self, path: &str, form: &T) -> Result<reqwest::Response, NofanError>
    where
        T: Serialize + ?Sized + Clone,
    {
        let secrets = self.to_secrets();
        let resp = reqwest::Client::new()
            .oauth1(secrets)
            .post(self.api_url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| NofanError::OauthError(e))?;
        Self::check(resp).await
    }

    // Exchanges username/password for a long-lived token pair.
    pub async fn xauth(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, String), NofanError> {
        let secrets = self.to_secrets();
        let endpoint = format!(
            "{}://{}{}",
            self.scheme(),
            self.oauth_domain,
            ACCESS_TOKEN_PATH
        );

        let resp = reqwest::Client::new()
            .oauth1(secrets)
            .post(endpoint)
            .form(&[
                ("x_auth_username", username),
                ("x_auth_password", password),
                ("x_auth_mode", "client_auth"),
            ])
            .send()
            .parse_oauth_token()
            .await
            .map_err(|e| NofanError::AuthenticationFailed(e.to_string()))?;

        Ok((resp.oauth_token, resp.oauth_token_secret))
    }

    pub async fn upload(&self, photo: &Path, status: &str) -> Result<reqwest::Response, NofanError> {
        let url = self.api_url("/photos/upload");
        let authorization = self.multipart_authorization(&url)?;

        let bytes = std::fs::read(photo)
            .map_err(|e| NofanError::IoError(format!("{}: {}", photo.display(), e)))?;
        let filename = photo
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.png".to_string());
        let form = reqwest::multipart::Form::new()
            .part("photo", reqwest::multipart::Part::bytes(bytes).file_name(filename))
            .text("status", status.to_string());

        let resp = reqwest::Client::new()
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NofanError::ReqwestError(e))?;
        Self::check(resp).await
    }

    // Multipart bodies sign only the oauth parameters.
    fn multipart_authorization(&self, url: &str) -> Result<String, NofanError> {
        match &self.oauth_token {
            Some((token, secret)) => {
                let token = oauth1_request::Token::from_parts(
                    self.consumer_key.as_str(),
                    self.consumer_secret.as_str(),
                    token.as_str(),
                    secret.as_str(),
                );
                Ok(oauth1_request::post(url, &(), &token, oauth1_request::HMAC_SHA1))
            }
            None => Err(NofanError::Unauthenticated),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, NofanError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let message = match resp.json::<ApiErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(NofanError::ApiError(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn builds_json_api_urls() {
        let config = Config::default();
        let ff = Fanfou::anonymous(&config);
        assert_eq!(
            ff.api_url("/statuses/home_timeline"),
            "https://api.fanfou.com/statuses/home_timeline.json"
        );

        let mut plain = Config::default();
        plain.ssl = false;
        plain.api_domain = "api.example.test".to_string();
        let ff = Fanfou::anonymous(&plain);
        assert_eq!(
            ff.api_url("/statuses/update"),
            "http://api.example.test/statuses/update.json"
        );
    }

    #[test]
    fn deserializes_status_payloads() {
        let json = r#"{
            "id": "abc123",
            "created_at": "Wed Jun 06 20:07:10 +0000 2012",
            "text": "hello",
            "user": {"id": "u1", "name": "alice", "screen_name": "alice"},
            "photo": {"largeurl": "http://photo.fanfou.com/p.jpg@200w.jpg"}
        }"#;

        let status: Status = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, "abc123");
        assert_eq!(
            status.created_at,
            Utc.with_ymd_and_hms(2012, 6, 6, 20, 7, 10).unwrap()
        );
        assert_eq!(status.user.unwrap().name, "alice");
        assert_eq!(
            status.photo.unwrap().largeurl,
            "http://photo.fanfou.com/p.jpg@200w.jpg"
        );
    }

    #[test]
    fn statuses_may_arrive_without_user_or_photo() {
        let json = r#"{
            "id": "abc123",
            "created_at": "Wed Jun 06 20:07:10 +0000 2012",
            "text": "hello"
        }"#;

        let status: Status = serde_json::from_str(json).unwrap();
        assert!(status.user.is_none());
        assert!(status.photo.is_none());
    }
}
