//! Member endpoints.
//!
//! Members are addressed by id or username; `me` is the token's owner.

use super::segment;
use crate::{Client, Params, Response, Result};
use serde::{de::DeserializeOwned, Deserialize};

const PATH: &str = "members";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub id_organizations: Vec<String>,
}

/// Member endpoints, obtained from [`Client::members`].
#[derive(Debug, Clone, Copy)]
pub struct Members<'a> {
    client: &'a Client,
}

impl<'a> Members<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn show<T>(&self, id_or_username: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(format!("{}/{}", PATH, segment(id_or_username)?), params)
            .await
    }

    /// The member the token belongs to.
    pub async fn me<T>(&self, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.show("me", params).await
    }

    pub async fn boards<T>(&self, id_or_username: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(format!("{}/{}/boards", PATH, segment(id_or_username)?), params)
            .await
    }

    pub async fn organizations<T>(
        &self,
        id_or_username: &str,
        params: Params,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(
                format!("{}/{}/organizations", PATH, segment(id_or_username)?),
                params,
            )
            .await
    }
}
