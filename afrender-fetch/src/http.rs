//! Blocking HTTP fetcher built on `ureq`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use afrender_core::Identifier;

use crate::error::{io_err, FetchError};
use crate::url::UrlTemplate;
use crate::StructureFetcher;

/// Fetches `GET <url_template with id>` and writes the body verbatim.
///
/// No retries. A failure mid-body can leave a truncated file behind.
pub struct HttpFetcher {
    agent: ureq::Agent,
    template: UrlTemplate,
}

impl HttpFetcher {
    /// `timeout` bounds the whole request; `None` keeps ureq's defaults.
    pub fn new(template: UrlTemplate, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(concat!("afrender/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            template,
        }
    }
}

impl StructureFetcher for HttpFetcher {
    fn fetch(&self, id: &Identifier, dest: &Path) -> Result<u64, FetchError> {
        let url = self.template.expand(id)?;
        tracing::debug!(%id, %url, "fetching structure");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FetchError::Status {
                    id: id.to_string(),
                    url,
                    code,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport {
                    id: id.to_string(),
                    url,
                    message: transport.to_string(),
                });
            }
        };

        let file = File::create(dest).map_err(|e| io_err(dest, e))?;
        let mut writer = BufWriter::new(file);
        let mut body = response.into_reader();
        let written = io::copy(&mut body, &mut writer).map_err(|e| io_err(dest, e))?;
        writer.flush().map_err(|e| io_err(dest, e))?;

        tracing::debug!(%id, bytes = written, path = %dest.display(), "structure saved");
        Ok(written)
    }
}
