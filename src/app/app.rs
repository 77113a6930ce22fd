use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::LocalStore;
use crate::infra_local::*;
use crate::logger::*;
use crate::settings::Settings;
use reqwest::Client;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    pub client: Arc<ApiClient>,
    pub auth_api: Arc<dyn AuthApi>,
    pub inventory_api: Arc<dyn InventoryApi>,
    cookie_file: Option<CookieFile>,
}

impl App {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let cookie_url = cookie_url_for(&settings.api.base_url)?;

        let jar = Arc::new(Jar::default());
        let cookie_file = settings.session.cookie_path.as_ref().map(CookieFile::new);
        if let Some(file) = &cookie_file {
            let restored = file.load_into(&jar, &cookie_url).await?;
            debug!(restored, "session cookies loaded");
        }

        let local_store: Arc<dyn LocalStore> = match settings.session.backend.as_str() {
            "file" => Arc::new(FileLocalStore::new(&settings.session.store_path)),
            "memory" => Arc::new(MemoryLocalStore::new()),
            other => return Err(anyhow::anyhow!("Unknown session backend: {}", other)),
        };

        let mut builder = Client::builder().cookie_provider(jar.clone());
        if let Some(secs) = settings.api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let session = SessionContext::new(jar, cookie_url, local_store);
        let pipeline = RequestPipeline::new(http, settings.api.base_url.as_str(), session);
        let client = Arc::new(ApiClient::new(pipeline));

        Ok(App {
            auth_api: client.clone(),
            inventory_api: client.clone(),
            client,
            cookie_file,
        })
    }

    /// Writes the session cookies back so the next run stays logged in.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        if let Some(file) = &self.cookie_file {
            let session = self.client.session();
            file.save_from(session.jar(), session.cookie_url()).await?;
            debug!(path = %file.path().display(), "session cookies saved");
        }
        Ok(())
    }
}
