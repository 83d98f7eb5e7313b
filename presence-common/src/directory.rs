//! User directory parsing
//!
//! The directory is an XML document of the form:
//!
//! ```xml
//! <intranet host="https://intranet.example.com">
//!   <users>
//!     <user id="10">
//!       <name>Maciej Z.</name>
//!       <avatar>/api/images/users/10</avatar>
//!     </user>
//!   </users>
//! </intranet>
//! ```
//!
//! Unlike attendance rows, the directory is all-or-nothing: any missing
//! element or attribute fails the whole parse.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::records::UserId;
use crate::Result;

/// Directory metadata for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub name: String,
    /// Absolute avatar URI
    pub avatar: String,
}

/// All known users, keyed by id
pub type UserDirectory = BTreeMap<UserId, UserInfo>;

#[derive(Debug, Deserialize)]
struct DirectoryDocument {
    #[serde(rename = "@host")]
    host: String,
    users: UsersElement,
}

#[derive(Debug, Deserialize)]
struct UsersElement {
    #[serde(rename = "user", default)]
    users: Vec<UserElement>,
}

#[derive(Debug, Deserialize)]
struct UserElement {
    #[serde(rename = "@id")]
    id: UserId,
    name: String,
    avatar: String,
}

/// Parse a directory document.
///
/// Fails with [`crate::Error::Directory`] on malformed or incomplete input.
pub fn parse_directory(xml: &str) -> Result<UserDirectory> {
    let document: DirectoryDocument = quick_xml::de::from_str(xml)?;
    let host = document.host;

    Ok(document
        .users
        .users
        .into_iter()
        .map(|user| {
            let info = UserInfo {
                avatar: avatar_uri(&host, &user.avatar),
                name: user.name,
            };
            (user.id, info)
        })
        .collect())
}

/// Read and parse a directory file
pub fn load_directory(path: &Path) -> Result<UserDirectory> {
    let xml = fs::read_to_string(path)?;
    let directory = parse_directory(&xml)?;

    info!("Loaded {} users from {}", directory.len(), path.display());

    Ok(directory)
}

/// Join host prefix and avatar path with exactly one slash
fn avatar_uri(host: &str, fragment: &str) -> String {
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        fragment.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<intranet host="https://intranet.example.com">
  <users>
    <user id="11">
      <name>Adam P.</name>
      <avatar>/api/images/users/11</avatar>
    </user>
    <user id="10">
      <name>Maciej Z.</name>
      <avatar>api/images/users/10</avatar>
    </user>
  </users>
</intranet>
"#;

    #[test]
    fn test_parse_directory() {
        let directory = parse_directory(SAMPLE).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.keys().copied().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(
            directory[&11],
            UserInfo {
                name: "Adam P.".to_string(),
                avatar: "https://intranet.example.com/api/images/users/11".to_string(),
            }
        );
        assert_eq!(
            directory[&10].avatar,
            "https://intranet.example.com/api/images/users/10"
        );
    }

    #[test]
    fn test_empty_user_list() {
        let xml = r#"<intranet host="https://intranet.example.com"><users/></intranet>"#;
        assert!(parse_directory(xml).unwrap().is_empty());
    }

    #[test]
    fn test_missing_host_fails() {
        let xml = r#"<intranet><users><user id="1"><name>A</name><avatar>/a</avatar></user></users></intranet>"#;
        assert!(matches!(parse_directory(xml), Err(Error::Directory(_))));
    }

    #[test]
    fn test_missing_user_id_fails() {
        let xml = r#"<intranet host="h"><users><user><name>A</name><avatar>/a</avatar></user></users></intranet>"#;
        assert!(matches!(parse_directory(xml), Err(Error::Directory(_))));
    }

    #[test]
    fn test_missing_name_fails_whole_document() {
        let xml = r#"<intranet host="h"><users>
            <user id="1"><name>A</name><avatar>/a</avatar></user>
            <user id="2"><avatar>/b</avatar></user>
        </users></intranet>"#;
        assert!(matches!(parse_directory(xml), Err(Error::Directory(_))));
    }

    #[test]
    fn test_non_numeric_id_fails() {
        let xml = r#"<intranet host="h"><users><user id="x"><name>A</name><avatar>/a</avatar></user></users></intranet>"#;
        assert!(matches!(parse_directory(xml), Err(Error::Directory(_))));
    }

    #[test]
    fn test_missing_users_element_fails() {
        let xml = r#"<intranet host="h"></intranet>"#;
        assert!(matches!(parse_directory(xml), Err(Error::Directory(_))));
    }

    #[test]
    fn test_avatar_uri_join() {
        assert_eq!(avatar_uri("http://h/", "/a/b"), "http://h/a/b");
        assert_eq!(avatar_uri("http://h", "a/b"), "http://h/a/b");
    }
}
