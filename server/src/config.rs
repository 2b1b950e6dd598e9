//! Server configuration, from the command line or the environment.
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// File name of the optional environment file.
pub const ENV_FILE: &str = ".env";

/// Load variables from the `.env` file in the given directory, if present.
///
/// Variables already set in the environment are left untouched.
/// Returns the path of the file which was read.
pub fn load_env_file(dir: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    let path = dir.join(ENV_FILE);
    match dotenvy::from_path(&path) {
        Ok(()) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// DICOM file upload, header inspection and PNG conversion service
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct ServerOptions {
    /// Directory where uploaded files are stored
    #[arg(long, env = "DICOM_FOLDER", default_value = "/tmp/dicom_files")]
    pub dicom_folder: PathBuf,

    /// Address to listen on
    #[arg(long, env = "DICOM_VAULT_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "DICOM_VAULT_PORT", default_value = "5000")]
    pub port: u16,

    /// Maximum size of an upload request body, in bytes
    #[arg(long, env = "DICOM_VAULT_MAX_UPLOAD_SIZE", default_value = "536870912")]
    pub max_upload_size: usize,

    /// Path at which to serve the interactive API documentation
    #[arg(long, env = "SWAGGER_URL")]
    pub swagger_url: Option<String>,

    /// URL of the OpenAPI document shown by the API documentation page
    #[arg(long, env = "SWAGGER_CONFIG_FILE_URL")]
    pub swagger_config_file_url: Option<String>,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Where the API documentation page lives and what it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDocs {
    /// route path of the page, always starting with `/`
    pub path: String,
    /// OpenAPI document loaded by the page
    pub spec_url: String,
}

impl ServerOptions {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The API documentation settings,
    /// if both the page path and the document URL are configured.
    pub fn api_docs(&self) -> Option<ApiDocs> {
        let path = self.swagger_url.as_deref().filter(|s| !s.is_empty())?;
        let spec_url = self
            .swagger_config_file_url
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some(ApiDocs {
            path: format!("/{}", path.trim_matches('/')),
            spec_url: spec_url.to_string(),
        })
    }
}
