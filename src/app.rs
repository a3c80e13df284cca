// app.rs
// Distributed under terms of the MIT license.

use crate::account;
use crate::entities;
use crate::error::NofanError;
use crate::fanfou::{Fanfou, Status, Trend, TrendList};
use crate::paint::paint;
use crate::render::{render, RenderOptions};
use crate::store::{Config, Credential, Store};
use crate::utils;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

const HTML_FORMAT: (&str, &str) = ("format", "html");

pub struct Nofan {
    store: Store,
    config: Config,
    verbose: bool,
    photo: Option<PathBuf>,
    clipboard: bool,
}

#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub display_count: Option<u32>,
    pub time_tag: Option<bool>,
    pub photo_tag: Option<bool>,
    pub ssl: Option<bool>,
    pub verbose: Option<bool>,
    pub api_domain: Option<String>,
    pub oauth_domain: Option<String>,
}

#[derive(Debug, Default)]
pub struct ColorUpdate {
    pub name: Option<String>,
    pub text: Option<String>,
    pub at: Option<String>,
    pub link: Option<String>,
    pub tag: Option<String>,
    pub photo: Option<String>,
    pub timeago: Option<String>,
    pub highlight: Option<String>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.consumer_key.is_none()
            && self.consumer_secret.is_none()
            && self.display_count.is_none()
            && self.time_tag.is_none()
            && self.photo_tag.is_none()
            && self.ssl.is_none()
            && self.verbose.is_none()
            && self.api_domain.is_none()
            && self.oauth_domain.is_none()
    }
}

impl ColorUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.at.is_none()
            && self.link.is_none()
            && self.tag.is_none()
            && self.photo.is_none()
            && self.timeago.is_none()
            && self.highlight.is_none()
    }
}

impl Nofan {
    pub fn new(
        store: Store,
        verbose: bool,
        photo: Option<PathBuf>,
        clipboard: bool,
    ) -> Result<Self, NofanError> {
        let config = store.load_config()?;
        let verbose = config.verbose || verbose;
        Ok(Nofan {
            store,
            config,
            verbose,
            photo,
            clipboard,
        })
    }

    // Resolving may repoint config.user at another account; the updated
    // pointer is persisted before the request goes out.
    fn client(&mut self) -> Result<Fanfou, NofanError> {
        let accounts = self.store.load_accounts()?;
        let (_, credential) = account::resolve_active(&mut self.config, &accounts)?;
        self.store.save_config(&self.config)?;
        Ok(Fanfou::new(&self.config, &credential))
    }

    async fn fetch<T>(
        &mut self,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<T, NofanError>
    where
        T: DeserializeOwned,
    {
        let ff = self.client()?;
        let resp = ff.get(path, &query).await?;
        resp.json::<T>()
            .await
            .map_err(|e| NofanError::ParseError(e.to_string()))
    }

    async fn submit(
        &mut self,
        path: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<serde_json::Value, NofanError> {
        let ff = self.client()?;
        let resp = ff.post(path, &form).await?;
        resp.json()
            .await
            .map_err(|e| NofanError::ParseError(e.to_string()))
    }

    fn count(&self) -> (&'static str, String) {
        ("count", self.config.display_count.to_string())
    }

    fn html(&self) -> (&'static str, String) {
        (HTML_FORMAT.0, HTML_FORMAT.1.to_string())
    }

    fn display(&self, statuses: &[Status]) -> Result<(), NofanError> {
        let options = RenderOptions {
            verbose: self.verbose,
            time_tag: self.config.time_tag,
            photo_tag: self.config.photo_tag,
            colors: &self.config.colors,
            now: Utc::now(),
            hyperlinks: utils::supports_hyperlinks(),
        };
        for line in render(statuses, &options)? {
            println!("{}", line);
        }
        Ok(())
    }

    async fn status(&mut self, id: &str) -> Result<Status, NofanError> {
        self.fetch("/statuses/show", vec![("id", id.to_string()), self.html()])
            .await
    }

    pub async fn home_timeline(&mut self) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch("/statuses/home_timeline", vec![self.count(), self.html()])
            .await?;
        self.display(&statuses)
    }

    pub async fn mentions(&mut self) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch("/statuses/mentions", vec![self.count(), self.html()])
            .await?;
        self.display(&statuses)
    }

    pub async fn me(&mut self) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch("/statuses/user_timeline", vec![self.count(), self.html()])
            .await?;
        self.display(&statuses)
    }

    pub async fn public_timeline(&mut self) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch("/statuses/public_timeline", vec![self.count(), self.html()])
            .await?;
        self.display(&statuses)
    }

    pub async fn context_timeline(&mut self, id: &str) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch(
                "/statuses/context_timeline",
                vec![("id", id.to_string()), self.html()],
            )
            .await?;
        self.display(&statuses)
    }

    pub async fn user_timeline(&mut self, id: &str) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self
            .fetch(
                "/statuses/user_timeline",
                vec![("id", id.to_string()), self.count(), self.html()],
            )
            .await?;
        self.display(&statuses)
    }

    pub async fn search_timeline(
        &mut self,
        query: &str,
        user: Option<&str>,
    ) -> Result<(), NofanError> {
        let mut params = vec![("q", query.to_string()), self.count(), self.html()];
        let path = match user {
            Some(id) => {
                params.push(("id", id.to_string()));
                "/search/user_timeline"
            }
            None => "/search/public_timeline",
        };
        let statuses: Vec<Status> = self.fetch(path, params).await?;
        self.display(&statuses)
    }

    pub async fn trends(&mut self) -> Result<(), NofanError> {
        let hot: TrendList = self.fetch("/trends/list", vec![]).await?;
        let saved: Vec<Trend> = self.fetch("/saved_searches/list", vec![]).await?;

        if hot.trends.is_empty() && saved.is_empty() {
            utils::info("No trends exist");
            return Ok(());
        }
        for trend in hot.trends.iter().chain(saved.iter()) {
            let query = trend.query.as_deref().unwrap_or(&trend.name);
            println!("{}", paint(&self.config.colors.tag, query));
        }
        utils::info("Run `nofan search <query>` to read one");
        Ok(())
    }

    pub async fn update(&mut self, text: &str) -> Result<(), NofanError> {
        self.submit("/statuses/update", vec![("status", text.to_string())])
            .await?;
        utils::succeed("Sent!");
        Ok(())
    }

    pub async fn upload(&mut self, text: &str) -> Result<(), NofanError> {
        let path = match (&self.photo, self.clipboard) {
            (Some(path), _) => path.clone(),
            (None, true) => utils::clipboard_image(self.store.base())?,
            (None, false) => {
                return Err(NofanError::IoError("no photo specified".to_string()));
            }
        };
        let ff = self.client()?;
        ff.upload(&path, text).await?;
        utils::succeed("Sent!");
        Ok(())
    }

    pub async fn undo(&mut self) -> Result<(), NofanError> {
        let statuses: Vec<Status> = self.fetch("/statuses/user_timeline", vec![]).await?;
        match statuses.first() {
            Some(latest) => {
                let id = latest.id.clone();
                self.submit("/statuses/destroy", vec![("id", id)]).await?;
                utils::succeed("Deleted!");
            }
            None => utils::info("No status to delete"),
        }
        Ok(())
    }

    pub async fn reply(&mut self, id: &str, text: &str) -> Result<(), NofanError> {
        let status = self.status(id).await?;
        let name = status
            .user
            .as_ref()
            .map(|user| user.name.clone())
            .unwrap_or_default();
        let reply_text = format!("@{} {}", name, text).trim().to_string();
        self.submit(
            "/statuses/update",
            vec![
                ("in_reply_to_status_id", id.to_string()),
                ("status", reply_text),
            ],
        )
        .await?;
        utils::succeed("Sent!");
        Ok(())
    }

    pub async fn repost(&mut self, id: &str, text: &str) -> Result<(), NofanError> {
        let status = self.status(id).await?;
        let name = status
            .user
            .as_ref()
            .map(|user| user.name.clone())
            .unwrap_or_default();
        let plain = entities::plain_text(&entities::entities(&status.text)?);
        let repost_text = format!("{} 转@{} {}", text, name, plain).trim().to_string();
        self.submit(
            "/statuses/update",
            vec![("repost_status_id", id.to_string()), ("status", repost_text)],
        )
        .await?;
        utils::succeed("Sent!");
        Ok(())
    }

    pub async fn show(&mut self, id: &str) -> Result<(), NofanError> {
        let status = self.status(id).await?;
        self.display(&[status])
    }

    pub async fn raw_get(&mut self, uri: &str) -> Result<(), NofanError> {
        let value: serde_json::Value = self.fetch(&normalize(uri), vec![]).await?;
        print_json(&value)
    }

    pub async fn raw_post(&mut self, uri: &str) -> Result<(), NofanError> {
        let value = self.submit(&normalize(uri), vec![]).await?;
        print_json(&value)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), NofanError> {
        let ff = Fanfou::anonymous(&self.config);
        let (oauth_token, oauth_token_secret) = ff.xauth(username, password).await?;

        self.config.user = Some(username.to_string());
        let mut accounts = self.store.load_accounts()?;
        accounts.insert(
            username.to_string(),
            Credential {
                consumer_key: self.config.consumer_key.clone(),
                consumer_secret: self.config.consumer_secret.clone(),
                oauth_token,
                oauth_token_secret,
            },
        );
        self.store.save_config(&self.config)?;
        self.store.save_accounts(&accounts)?;
        utils::succeed("Login succeed!");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), NofanError> {
        let mut accounts = self.store.load_accounts()?;
        if account::remove_active(&mut self.config, &mut accounts) {
            self.store.save_config(&self.config)?;
            self.store.save_accounts(&accounts)?;
            utils::succeed("Logout succeed!");
        }
        Ok(())
    }

    pub fn switch_user(&mut self, name: Option<&str>) -> Result<(), NofanError> {
        let accounts = self.store.load_accounts()?;

        let target = match name {
            Some(name) => Some(name.to_string()),
            // one stored account resolves trivially; several need a name
            None => match accounts.len() {
                0 => return Err(NofanError::Unauthenticated),
                1 => accounts.keys().next().cloned(),
                _ => {
                    let current = self.config.user.clone();
                    for account_name in accounts.keys() {
                        if Some(account_name) == current.as_ref() {
                            println!("{} {}", account_name, paint("green", "(current)"));
                        } else {
                            println!("{}", account_name);
                        }
                    }
                    utils::info("Pass an account name to switch");
                    return Ok(());
                }
            },
        };

        if let Some(target) = target {
            let found = account::switch_to(&mut self.config, &accounts, &target)?;
            self.store.save_config(&self.config)?;
            utils::succeed(&format!("Switch account to {}", paint("blue.bold", &found)));
        }
        Ok(())
    }

    pub fn configure(&mut self, update: ConfigUpdate) -> Result<(), NofanError> {
        if update.is_empty() {
            return print_json(&serde_json::to_value(&self.config).map_err(|e| {
                NofanError::ParseError(e.to_string())
            })?);
        }

        let config = &mut self.config;
        if let Some(key) = update.consumer_key {
            config.consumer_key = key;
        }
        if let Some(secret) = update.consumer_secret {
            config.consumer_secret = secret;
        }
        if let Some(count) = update.display_count {
            config.display_count = count;
        }
        if let Some(time_tag) = update.time_tag {
            config.time_tag = time_tag;
        }
        if let Some(photo_tag) = update.photo_tag {
            config.photo_tag = photo_tag;
        }
        if let Some(ssl) = update.ssl {
            config.ssl = ssl;
        }
        if let Some(verbose) = update.verbose {
            config.verbose = verbose;
        }
        if let Some(api_domain) = update.api_domain {
            config.api_domain = api_domain;
        }
        if let Some(oauth_domain) = update.oauth_domain {
            config.oauth_domain = oauth_domain;
        }

        self.store.save_config(&self.config)?;
        utils::succeed("Configuration saved");
        Ok(())
    }

    pub fn colors(&mut self, update: ColorUpdate) -> Result<(), NofanError> {
        if update.is_empty() {
            let colors = &self.config.colors;
            for (role, descriptor) in [
                ("name", &colors.name),
                ("text", &colors.text),
                ("at", &colors.at),
                ("link", &colors.link),
                ("tag", &colors.tag),
                ("photo", &colors.photo),
                ("timeago", &colors.timeago),
                ("highlight", &colors.highlight),
            ] {
                println!("{}: {}", role, paint(descriptor, descriptor));
            }
            return Ok(());
        }

        let colors = &mut self.config.colors;
        if let Some(name) = update.name {
            colors.name = name;
        }
        if let Some(text) = update.text {
            colors.text = text;
        }
        if let Some(at) = update.at {
            colors.at = at;
        }
        if let Some(link) = update.link {
            colors.link = link;
        }
        if let Some(tag) = update.tag {
            colors.tag = tag;
        }
        if let Some(photo) = update.photo {
            colors.photo = photo;
        }
        if let Some(timeago) = update.timeago {
            colors.timeago = timeago;
        }
        if let Some(highlight) = update.highlight {
            colors.highlight = highlight;
        }

        self.store.save_config(&self.config)?;
        utils::succeed("Colors saved");
        Ok(())
    }
}

fn normalize(uri: &str) -> String {
    if uri.starts_with('/') {
        uri.to_string()
    } else {
        format!("/{}", uri)
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), NofanError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| NofanError::ParseError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
