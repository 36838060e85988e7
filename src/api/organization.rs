//! Organization (workspace) endpoints.
//!
//! See <https://developer.atlassian.com/cloud/trello/rest/api-group-organizations/>.

use super::segment;
use crate::{ApiRequest, Body, Client, Error, Params, Response, Result};
use http::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PATH: &str = "organizations";

/// Fields that can be read individually with [`Organizations::field`].
pub const FIELDS: &[&str] = &[
    "name",
    "displayName",
    "desc",
    "descData",
    "idBoards",
    "invited",
    "invitations",
    "memberships",
    "prefs",
    "powerUps",
    "products",
    "billableMemberCount",
    "url",
    "website",
    "logoHash",
    "premiumFeatures",
];

/// Role granted to someone invited into an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Admin,
    Normal,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Admin => "admin",
            MemberType::Normal => "normal",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(MemberType::Admin),
            "normal" => Ok(MemberType::Normal),
            other => Err(Error::InvalidValue {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

/// An organization as returned by `GET organizations/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub desc: String,
    pub url: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub id_boards: Vec<String>,
}

/// One entry of `GET organizations/{id}/memberships`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub id_member: String,
    /// `admin` or `normal`; kept as text since Trello may return other roles.
    pub member_type: String,
    #[serde(default)]
    pub unconfirmed: bool,
    #[serde(default)]
    pub deactivated: bool,
}

#[derive(Serialize)]
struct Invitation<'a> {
    email: &'a str,
    #[serde(rename = "fullName")]
    full_name: &'a str,
    #[serde(rename = "type")]
    member_type: MemberType,
}

/// Organization endpoints, obtained from [`Client::organizations`].
#[derive(Debug, Clone, Copy)]
pub struct Organizations<'a> {
    client: &'a Client,
}

impl<'a> Organizations<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(id: &str) -> Result<String> {
        Ok(format!("{}/{}", PATH, segment(id)?))
    }

    /// Finds an organization by id or name.
    pub async fn show<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client.get(Self::path(id)?, params).await
    }

    /// Reads a single field of an organization.
    ///
    /// `field` must be one of [`FIELDS`]; anything else is rejected before a
    /// request is made.
    pub async fn field<T>(&self, id: &str, field: &str) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        if !FIELDS.contains(&field) {
            return Err(Error::InvalidValue {
                field: "field",
                value: field.to_string(),
            });
        }
        self.client
            .get(format!("{}/{}", Self::path(id)?, field), Params::new())
            .await
    }

    /// Lists the organization's boards, in Trello's order.
    pub async fn boards<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(format!("{}/boards", Self::path(id)?), params)
            .await
    }

    /// Lists the organization's memberships with member details included.
    ///
    /// `member=true` is always sent, replacing any value in `params`.
    pub async fn members<T>(&self, id: &str, mut params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        params.insert("member", "true");
        self.client
            .get(format!("{}/memberships", Self::path(id)?), params)
            .await
    }

    /// Invites someone into the organization by email.
    pub async fn invite<T>(
        &self,
        id: &str,
        email: &str,
        full_name: &str,
        member_type: MemberType,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let body = Body::json(&Invitation {
            email,
            full_name,
            member_type,
        })?;
        let request =
            ApiRequest::new(Method::PUT, format!("{}/members", Self::path(id)?)).with_body(body);
        self.client.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_type_accepts_only_known_roles() {
        assert_eq!("admin".parse::<MemberType>().unwrap(), MemberType::Admin);
        assert_eq!("normal".parse::<MemberType>().unwrap(), MemberType::Normal);

        let err = "observer".parse::<MemberType>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidValue { field: "type", ref value } if value == "observer"
        ));
        assert!("Admin".parse::<MemberType>().is_err());
    }

    #[test]
    fn invitation_serializes_with_trello_names() {
        let body = serde_json::to_string(&Invitation {
            email: "a@x.com",
            full_name: "A B",
            member_type: MemberType::Admin,
        })
        .unwrap();
        assert_eq!(body, r#"{"email":"a@x.com","fullName":"A B","type":"admin"}"#);
    }

    #[test]
    fn organization_ignores_unknown_fields() {
        let org: Organization = serde_json::from_str(
            r#"{"id":"o1","name":"acme","displayName":"Acme Inc","logoHash":null,"idBoards":["b1"]}"#,
        )
        .unwrap();
        assert_eq!(org.display_name, "Acme Inc");
        assert_eq!(org.id_boards, vec!["b1".to_string()]);
        assert_eq!(org.url, None);
    }
}
