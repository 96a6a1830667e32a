// Application context handed to every command.
//
// Holds what the browser client kept in global stores: configuration, the
// authenticated API client, and the "has seen the tutorial" flag. It is built
// once in `init` and released in `teardown`; nothing here is a global.

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::ExecutionSession;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const TUTORIAL_MARKER: &str = "tutorial_seen";

pub struct AppContext {
    config: ClientConfig,
    api: Arc<ApiClient>,
}

impl AppContext {
    pub fn init(config: ClientConfig) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        info!(
            api = %api.base_url(),
            authenticated = config.auth_token.is_some(),
            "Client context initialized"
        );
        Ok(Self { config, api })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    /// Fresh session sharing this context's API client.
    pub fn session(&self) -> ExecutionSession<ApiClient> {
        ExecutionSession::new(self.api(), self.config.poll.clone())
    }

    fn tutorial_marker(&self) -> PathBuf {
        self.config.state_dir.join(TUTORIAL_MARKER)
    }

    /// True until `mark_tutorial_seen` has been called once in this state dir.
    pub fn tutorial_pending(&self) -> bool {
        !self.tutorial_marker().exists()
    }

    pub fn mark_tutorial_seen(&self) -> io::Result<()> {
        fs::create_dir_all(&self.config.state_dir)?;
        fs::write(self.tutorial_marker(), b"1")?;
        debug!(path = %self.tutorial_marker().display(), "Tutorial marked as seen");
        Ok(())
    }

    /// Sessions created from this context keep their own handle to the client.
    pub fn teardown(self) {
        info!(api = %self.api.base_url(), "Client context closed");
    }
}
