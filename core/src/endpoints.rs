//! Endpoint bindings for the objects API (`/api/v4/objects`).

use serde_json::Value;

use crate::dto::{Dto, MaybeUnset};
use crate::endpoint::Endpoint;
use crate::http::HttpMethod;
use crate::resolve::{json, json_list, StatusTable};
use crate::types::{ApiHttpError, CreateObjectBody, ObjectDto, UpdateObjectBody};

/// `GET /api/v4/objects`
#[derive(Debug, Clone, Default)]
pub struct ListObjects {
    pub name_prefix: MaybeUnset<String>,
    pub limit: MaybeUnset<u32>,
}

impl Endpoint for ListObjects {
    type Output = Vec<ObjectDto>;
    type Error = ApiHttpError;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/v4/objects";

    fn query_params(&self) -> Vec<(&'static str, MaybeUnset<String>)> {
        vec![
            ("name_prefix", self.name_prefix.clone()),
            ("limit", self.limit.map(|limit| limit.to_string())),
        ]
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error> {
        StatusTable::new()
            .success(200, json_list::<ObjectDto>)
            .typed_error(400, json::<ApiHttpError>)
            .typed_error(500, json::<ApiHttpError>)
    }
}

/// `GET /api/v4/objects/{object_id}`
#[derive(Debug, Clone)]
pub struct GetObject {
    pub object_id: String,
    pub effective: MaybeUnset<bool>,
}

impl GetObject {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            effective: MaybeUnset::Unset,
        }
    }
}

impl Endpoint for GetObject {
    type Output = ObjectDto;
    type Error = ApiHttpError;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/v4/objects/{object_id}";

    fn path_params(&self) -> Vec<(&'static str, String)> {
        vec![("object_id", self.object_id.clone())]
    }

    fn query_params(&self) -> Vec<(&'static str, MaybeUnset<String>)> {
        vec![("effective", self.effective.map(|flag| flag.to_string()))]
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error> {
        StatusTable::new()
            .success(200, json::<ObjectDto>)
            .typed_error(400, json::<ApiHttpError>)
            .typed_error(404, json::<ApiHttpError>)
            .typed_error(500, json::<ApiHttpError>)
    }
}

/// `POST /api/v4/objects`
#[derive(Debug, Clone)]
pub struct CreateObject {
    pub body: CreateObjectBody,
}

impl Endpoint for CreateObject {
    type Output = ObjectDto;
    type Error = ApiHttpError;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/v4/objects";

    fn json_body(&self) -> Result<Option<Value>, serde_json::Error> {
        Ok(Some(Value::Object(self.body.to_dict()?)))
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error> {
        StatusTable::new()
            .success(200, json::<ObjectDto>)
            .success(201, json::<ObjectDto>)
            .typed_error(400, json::<ApiHttpError>)
            .typed_error(500, json::<ApiHttpError>)
    }
}

/// `PATCH /api/v4/objects/{object_id}`
#[derive(Debug, Clone)]
pub struct UpdateObject {
    pub object_id: String,
    pub body: UpdateObjectBody,
}

impl Endpoint for UpdateObject {
    type Output = ObjectDto;
    type Error = ApiHttpError;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const PATH: &'static str = "/api/v4/objects/{object_id}";

    fn path_params(&self) -> Vec<(&'static str, String)> {
        vec![("object_id", self.object_id.clone())]
    }

    fn json_body(&self) -> Result<Option<Value>, serde_json::Error> {
        Ok(Some(Value::Object(self.body.to_dict()?)))
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error> {
        StatusTable::new()
            .success(200, json::<ObjectDto>)
            .typed_error(400, json::<ApiHttpError>)
            .typed_error(404, json::<ApiHttpError>)
            .typed_error(500, json::<ApiHttpError>)
    }
}

/// `DELETE /api/v4/objects/{object_id}`
#[derive(Debug, Clone)]
pub struct DeleteObject {
    pub object_id: String,
}

impl Endpoint for DeleteObject {
    type Output = ();
    type Error = ApiHttpError;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const PATH: &'static str = "/api/v4/objects/{object_id}";

    fn path_params(&self) -> Vec<(&'static str, String)> {
        vec![("object_id", self.object_id.clone())]
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error> {
        StatusTable::new()
            .no_content(204)
            .typed_error(404, json::<ApiHttpError>)
            .typed_error(500, json::<ApiHttpError>)
    }
}
