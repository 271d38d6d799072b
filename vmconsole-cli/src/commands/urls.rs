//! `urls` command: show the connection URL each option resolves to.

use std::path::Path;

use vmconsole_core::adapter::{
    build_mks_proxy_url, build_mks_proxy_url_redacted, build_vnc_proxy_url,
    build_vnc_proxy_url_redacted, build_webmks_url, build_webmks_url_redacted,
};
use vmconsole_core::models::ConnectionDetails;

use crate::error::CliError;
use crate::util;

/// Prints the computed connection URL for every option. Tickets are
/// redacted unless `reveal` is set.
pub fn cmd_urls(file: Option<&Path>, reveal: bool) -> Result<(), CliError> {
    let descriptor = util::load_descriptor(file)?;

    for (index, option) in descriptor.console_options.iter().enumerate() {
        let url = match &option.details {
            ConnectionDetails::Vnc(details) => {
                if reveal {
                    build_vnc_proxy_url(details)
                } else {
                    build_vnc_proxy_url_redacted(details)
                }
            }
            ConnectionDetails::Webmks(details) => {
                if reveal {
                    build_webmks_url(details)
                } else {
                    build_webmks_url_redacted(details)
                }
            }
            ConnectionDetails::Mks(details) => {
                if reveal {
                    build_mks_proxy_url(details)
                } else {
                    build_mks_proxy_url_redacted(details)
                }
            }
            ConnectionDetails::Html5(details) => details.url.clone(),
        };
        println!("option {index} [{}]: {url}", option.kind().as_str());
    }

    Ok(())
}
