//! Console option types and the backend console descriptor.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{ConsoleError, ConsoleResult};

/// Protocol kind of a console option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    /// VNC over WebSocket through an authenticated console proxy
    Vnc,
    /// WebMKS ticket protocol (direct `wss://` to the host)
    Webmks,
    /// MKS ticket protocol routed through a console proxy
    Mks,
    /// Direct HTML5 console URL loaded as a navigable document
    Html5,
}

impl ConsoleKind {
    /// Returns the kind identifier as a lowercase string (wire name)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vnc => "vnc",
            Self::Webmks => "webmks",
            Self::Mks => "mks",
            Self::Html5 => "html5",
        }
    }
}

impl std::fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vnc => write!(f, "VNC"),
            Self::Webmks => write!(f, "WebMKS"),
            Self::Mks => write!(f, "MKS"),
            Self::Html5 => write!(f, "HTML5"),
        }
    }
}

/// Connection parameters for a VNC-over-WebSocket console.
///
/// The proxy endpoint bridges the WebSocket to the VM's raw VNC port; it
/// is an external collaborator whose URL contract this crate consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VncDetails {
    /// Console proxy host
    pub host: String,
    /// Console proxy port
    pub port: u16,
    /// Hypervisor node the VM runs on
    pub node: String,
    /// VM identifier on the node
    pub vm_id: String,
    /// VNC port the proxy bridges to
    pub vnc_port: u16,
    /// Short-lived console ticket
    pub ticket: SecretString,
    /// Whether to dial `wss://` (true) or plain `ws://`
    #[serde(default = "default_tls")]
    pub tls: bool,
}

/// Connection parameters for a WebMKS ticket console
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebmksDetails {
    /// ESXi host serving the console
    pub host: String,
    /// WebMKS port (usually 443 or 902)
    pub port: u16,
    /// Short-lived WebMKS ticket
    pub ticket: SecretString,
    /// Host TLS thumbprint, validated by the native client
    #[serde(default)]
    pub ssl_thumbprint: Option<String>,
}

/// Connection parameters for an MKS-ticket-via-proxy console
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MksDetails {
    /// vCenter host exposing the console proxy
    #[serde(rename = "vCenterHost")]
    pub vcenter_host: String,
    /// Short-lived MKS ticket
    pub mks_ticket: SecretString,
    /// ESXi host the proxy forwards to
    pub esxi_host: String,
    /// ESXi console port
    pub esxi_port: u16,
    /// Datastore path of the VM configuration file
    pub cfg_file: String,
    /// ESXi TLS thumbprint, validated by the native client
    #[serde(default)]
    pub ssl_thumbprint: Option<String>,
}

/// Connection parameters for a direct HTML5 console
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Html5Details {
    /// Absolute backend-supplied console URL
    pub url: String,
}

/// Variant-specific connection details, discriminated by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "connectionDetails", rename_all = "lowercase")]
pub enum ConnectionDetails {
    /// VNC-over-WebSocket parameters
    Vnc(VncDetails),
    /// WebMKS ticket parameters
    Webmks(WebmksDetails),
    /// MKS-via-proxy parameters
    Mks(MksDetails),
    /// Direct HTML5 URL
    Html5(Html5Details),
}

impl ConnectionDetails {
    /// Returns the protocol kind of these details
    #[must_use]
    pub const fn kind(&self) -> ConsoleKind {
        match self {
            Self::Vnc(_) => ConsoleKind::Vnc,
            Self::Webmks(_) => ConsoleKind::Webmks,
            Self::Mks(_) => ConsoleKind::Mks,
            Self::Html5(_) => ConsoleKind::Html5,
        }
    }
}

/// One backend-declared method of reaching a VM's display.
///
/// Insertion order in the descriptor is priority order; each option gets
/// exactly one attempt per session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleOption {
    /// Protocol kind and its connection parameters
    #[serde(flatten)]
    pub details: ConnectionDetails,
    /// Optional label for status text
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ConsoleOption {
    /// Creates an option from connection details
    #[must_use]
    pub const fn new(details: ConnectionDetails) -> Self {
        Self {
            details,
            display_name: None,
        }
    }

    /// Sets the display label
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the protocol kind of this option
    #[must_use]
    pub const fn kind(&self) -> ConsoleKind {
        self.details.kind()
    }

    /// Returns the label to show while this option is being attempted
    #[must_use]
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.kind().to_string())
    }

    /// Validates the structural shape of this option.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidOptions`] when a required field is
    /// empty or a port is zero. This is the only synchronous failure path
    /// of session open.
    pub fn validate(&self) -> ConsoleResult<()> {
        match &self.details {
            ConnectionDetails::Vnc(d) => {
                require_nonempty("vnc host", &d.host)?;
                require_nonempty("vnc node", &d.node)?;
                require_nonempty("vnc vmId", &d.vm_id)?;
                require_nonempty("vnc ticket", d.ticket.expose_secret())?;
                require_port("vnc port", d.port)?;
                require_port("vnc vncPort", d.vnc_port)
            }
            ConnectionDetails::Webmks(d) => {
                require_nonempty("webmks host", &d.host)?;
                require_nonempty("webmks ticket", d.ticket.expose_secret())?;
                require_port("webmks port", d.port)
            }
            ConnectionDetails::Mks(d) => {
                require_nonempty("mks vCenterHost", &d.vcenter_host)?;
                require_nonempty("mks esxiHost", &d.esxi_host)?;
                require_nonempty("mks mksTicket", d.mks_ticket.expose_secret())?;
                require_nonempty("mks cfgFile", &d.cfg_file)?;
                require_port("mks esxiPort", d.esxi_port)
            }
            ConnectionDetails::Html5(d) => {
                require_nonempty("html5 url", &d.url)?;
                if d.url.starts_with("http://")
                    || d.url.starts_with("https://")
                    || d.url.starts_with("ws://")
                    || d.url.starts_with("wss://")
                {
                    Ok(())
                } else {
                    Err(ConsoleError::InvalidOptions(format!(
                        "html5 url has unsupported scheme: {}",
                        d.url
                    )))
                }
            }
        }
    }
}

/// The backend console payload for one VM:
/// `{ "vmName": ..., "consoleOptions": [...] }`, options ordered by the
/// backend's preferred-method priority.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConsoleDescriptor {
    /// Human-readable VM name
    pub vm_name: String,
    /// Console options in priority order
    pub console_options: Vec<ConsoleOption>,
}

impl VmConsoleDescriptor {
    /// Parses a descriptor from backend JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidOptions`] when the payload does not
    /// match the wire contract.
    pub fn from_json(json: &str) -> ConsoleResult<Self> {
        serde_json::from_str(json).map_err(|e| ConsoleError::InvalidOptions(e.to_string()))
    }

    /// Validates every option in the descriptor
    ///
    /// # Errors
    ///
    /// Returns the first [`ConsoleError::InvalidOptions`] found.
    pub fn validate(&self) -> ConsoleResult<()> {
        for option in &self.console_options {
            option.validate()?;
        }
        Ok(())
    }
}

const fn default_tls() -> bool {
    true
}

fn require_nonempty(field: &str, value: &str) -> ConsoleResult<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::InvalidOptions(format!("{field} is empty")));
    }
    Ok(())
}

fn require_port(field: &str, port: u16) -> ConsoleResult<()> {
    if port == 0 {
        return Err(ConsoleError::InvalidOptions(format!("{field} is zero")));
    }
    Ok(())
}
