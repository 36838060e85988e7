//! Board endpoints.

use super::segment;
use crate::{Client, Params, Response, Result};
use serde::{de::DeserializeOwned, Deserialize};

const PATH: &str = "boards";

/// A board as returned by `GET boards/{id}` and the board listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub closed: bool,
    pub url: Option<String>,
    pub id_organization: Option<String>,
}

/// Board endpoints, obtained from [`Client::boards`].
#[derive(Debug, Clone, Copy)]
pub struct Boards<'a> {
    client: &'a Client,
}

impl<'a> Boards<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(id: &str, rest: &str) -> Result<String> {
        let id = segment(id)?;
        if rest.is_empty() {
            Ok(format!("{}/{}", PATH, id))
        } else {
            Ok(format!("{}/{}/{}", PATH, id, rest))
        }
    }

    pub async fn show<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client.get(Self::path(id, "")?, params).await
    }

    pub async fn lists<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client.get(Self::path(id, "lists")?, params).await
    }

    pub async fn cards<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client.get(Self::path(id, "cards")?, params).await
    }

    pub async fn members<T>(&self, id: &str, params: Params) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.client.get(Self::path(id, "members")?, params).await
    }
}
