//! Wire models for the Silverline `ip_objects` REST API
//!
//! Request and response shapes follow the portal API docs
//! (`/docs/api/v1/ip_objects.md`). The one quirk worth knowing: a GET may
//! return `data` as a single object or as a sequence, so [`OneOrMany`]
//! normalizes both into the same `Vec` right at the deserialization boundary.

use crate::types::PagingData;
use serde::{Deserialize, Serialize};

/// A response `data` field that is either a single value or a sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalize into a sequence; a single value becomes a one-element vec.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// A single IP object as returned by the API.
///
/// The `attributes` and `meta` containers are mandatory; a response element
/// missing either is malformed and fails deserialization. Leaf fields other
/// than `ip` may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpObject {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: IpObjectAttributes,
    pub meta: IpObjectMeta,
}

/// Attributes of an IP object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpObjectAttributes {
    pub ip: String,
    pub mask: Option<String>,
    pub duration: Option<i64>,
    pub expires_at: Option<String>,
    pub list_target: Option<String>,
}

/// Metadata of an IP object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpObjectMeta {
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// An element of the `data` field that may be an empty placeholder.
///
/// The portal occasionally emits null or empty elements inside `data`; those
/// are dropped without affecting their neighbors. A non-empty element must
/// still be a well-formed IP object, so a mapping missing `attributes` or
/// `meta` remains a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaybeIpObject(pub Option<IpObject>);

fn is_empty_element(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl<'de> Deserialize<'de> for MaybeIpObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if is_empty_element(&value) {
            return Ok(MaybeIpObject(None));
        }
        IpObject::deserialize(value)
            .map(|object| MaybeIpObject(Some(object)))
            .map_err(serde::de::Error::custom)
    }
}

/// Navigation links attached to paged collection responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationLinks {
    /// Link to the current page
    #[serde(rename = "self")]
    pub current: Option<String>,
    /// Link to the last page; absent when the current page is the last one
    pub last: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Response to a GET on the `ip_objects` collection or a single object.
///
/// The API returns no envelope beyond `data` and the optional `links`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpObjectsResponse {
    /// Single object for by-id lookups, sequence for collection fetches.
    /// Null or absent when nothing matched.
    #[serde(default)]
    pub data: OneOrMany<MaybeIpObject>,
    #[serde(default)]
    pub links: Option<NavigationLinks>,
}

impl IpObjectsResponse {
    /// Canonical sequence of objects, with null/empty elements dropped.
    pub fn into_objects(self) -> Vec<IpObject> {
        self.data
            .into_vec()
            .into_iter()
            .filter_map(|element| element.0)
            .collect()
    }
}

/// Body of a POST creating an IP object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIpObjectRequest {
    pub list_target: String,
    pub data: AddIpObjectData,
}

/// `data` member of [`AddIpObjectRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIpObjectData {
    /// Always empty on create; the service assigns the id
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: AddIpObjectAttributes,
    pub meta: AddIpObjectMeta,
}

/// `data.attributes` member of [`AddIpObjectRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIpObjectAttributes {
    pub mask: String,
    pub ip: String,
    pub duration: i64,
}

/// `data.meta` member of [`AddIpObjectRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIpObjectMeta {
    pub note: String,
    pub tags: Vec<String>,
}

impl AddIpObjectRequest {
    /// Build the nested create body the API expects.
    pub fn new(
        ip: String,
        list_target: String,
        mask: String,
        duration: i64,
        note: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            list_target,
            data: AddIpObjectData {
                id: String::new(),
                kind: "ip_objects".to_string(),
                attributes: AddIpObjectAttributes { mask, ip, duration },
                meta: AddIpObjectMeta { note, tags },
            },
        }
    }
}

/// Extract the page number from a navigation link.
///
/// Looks for `page[number]=<digits>` inside the link, accepting both the
/// literal and the percent-encoded (`page%5Bnumber%5D=`) spelling.
pub fn extract_page_number(link: &str) -> Option<u64> {
    let decoded = urlencoding::decode(link)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| link.to_string());

    let start = decoded.find("page[number]=")? + "page[number]=".len();
    let digits: String = decoded[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl PagingData {
    /// Derive the paging descriptor for a paged collection response.
    ///
    /// A missing self link falls back to the page number the caller asked
    /// for; a missing last link means the current page is the last one.
    pub fn from_links(
        links: Option<&NavigationLinks>,
        requested_page_number: u64,
        page_size: u64,
    ) -> Self {
        let current_page_number = links
            .and_then(|l| l.current.as_deref())
            .and_then(extract_page_number)
            .unwrap_or(requested_page_number);
        let last_page_number = links
            .and_then(|l| l.last.as_deref())
            .and_then(extract_page_number)
            .unwrap_or(current_page_number);

        Self {
            current_page_number,
            current_page_size: page_size,
            last_page_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_object_json(id: &str) -> String {
        format!(
            r#"{{
                "id": "{}",
                "type": "ip_objects",
                "attributes": {{
                    "ip": "203.0.113.7",
                    "mask": "32",
                    "duration": 0,
                    "expires_at": null,
                    "list_target": "proxy-routed"
                }},
                "meta": {{
                    "note": "bad actor",
                    "tags": ["abuse"],
                    "created_at": "2021-05-13T13:54:34.416Z",
                    "updated_at": "2021-05-13T13:54:34.416Z"
                }}
            }}"#,
            id
        )
    }

    #[test]
    fn test_single_object_and_one_element_sequence_parse_identically() {
        let single = format!(r#"{{"data": {}}}"#, sample_object_json("a1"));
        let sequence = format!(r#"{{"data": [{}]}}"#, sample_object_json("a1"));

        let from_single: IpObjectsResponse = serde_json::from_str(&single).unwrap();
        let from_sequence: IpObjectsResponse = serde_json::from_str(&sequence).unwrap();

        assert_eq!(from_single.into_objects(), from_sequence.into_objects());
    }

    #[test]
    fn test_null_elements_are_dropped() {
        let body = format!(
            r#"{{"data": [null, {}, null, {}]}}"#,
            sample_object_json("a1"),
            sample_object_json("b2")
        );
        let response: IpObjectsResponse = serde_json::from_str(&body).unwrap();
        let objects = response.into_objects();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].id, "a1");
        assert_eq!(objects[1].id, "b2");
    }

    #[test]
    fn test_null_data_yields_no_objects() {
        let response: IpObjectsResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(response.into_objects().is_empty());

        let response: IpObjectsResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(response.into_objects().is_empty());
    }

    #[test]
    fn test_empty_mapping_elements_are_skipped() {
        let body = format!(
            r#"{{"data": [{{}}, {}]}}"#,
            sample_object_json("a1")
        );
        let response: IpObjectsResponse = serde_json::from_str(&body).unwrap();
        let objects = response.into_objects();

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, "a1");
    }

    #[test]
    fn test_single_empty_mapping_yields_no_objects() {
        let response: IpObjectsResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(response.into_objects().is_empty());
    }

    #[test]
    fn test_missing_attributes_container_is_an_error() {
        let body = r#"{"data": {"id": "a1", "meta": {"note": null, "tags": null,
            "created_at": null, "updated_at": null}}}"#;
        assert!(serde_json::from_str::<IpObjectsResponse>(body).is_err());
    }

    #[test]
    fn test_extract_page_number() {
        let link = "https://portal.f5silverline.com/api/v1/ip_lists/denylist/ip_objects?page[number]=3&page[size]=25";
        assert_eq!(extract_page_number(link), Some(3));
    }

    #[test]
    fn test_extract_page_number_percent_encoded() {
        let link = "https://portal.f5silverline.com/api/v1/ip_lists/denylist/ip_objects?page%5Bnumber%5D=12&page%5Bsize%5D=25";
        assert_eq!(extract_page_number(link), Some(12));
    }

    #[test]
    fn test_extract_page_number_absent() {
        assert_eq!(
            extract_page_number("https://portal.f5silverline.com/api/v1/ip_lists"),
            None
        );
    }

    #[test]
    fn test_paging_from_self_and_last_links() {
        let links = NavigationLinks {
            current: Some("https://x/ip_objects?page[number]=3&page[size]=25".to_string()),
            last: Some("https://x/ip_objects?page[number]=7&page[size]=25".to_string()),
            ..Default::default()
        };

        let paging = PagingData::from_links(Some(&links), 3, 25);
        assert_eq!(paging.current_page_number, 3);
        assert_eq!(paging.last_page_number, 7);
        assert_eq!(paging.current_page_size, 25);
    }

    #[test]
    fn test_paging_missing_last_link_falls_back_to_current() {
        let links = NavigationLinks {
            current: Some("https://x/ip_objects?page[number]=7&page[size]=25".to_string()),
            last: None,
            ..Default::default()
        };

        let paging = PagingData::from_links(Some(&links), 7, 25);
        assert_eq!(paging.current_page_number, 7);
        assert_eq!(paging.last_page_number, 7);
    }

    #[test]
    fn test_paging_missing_self_link_falls_back_to_requested_page() {
        let paging = PagingData::from_links(None, 4, 10);
        assert_eq!(paging.current_page_number, 4);
        assert_eq!(paging.last_page_number, 4);
        assert_eq!(paging.current_page_size, 10);
    }

    #[test]
    fn test_add_request_body_shape_with_defaults() {
        let request = AddIpObjectRequest::new(
            "198.51.100.1".to_string(),
            "proxy-routed".to_string(),
            "32".to_string(),
            0,
            String::new(),
            Vec::new(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["list_target"], "proxy-routed");
        assert_eq!(json["data"]["id"], "");
        assert_eq!(json["data"]["type"], "ip_objects");
        assert_eq!(json["data"]["attributes"]["ip"], "198.51.100.1");
        assert_eq!(json["data"]["attributes"]["mask"], "32");
        assert_eq!(json["data"]["attributes"]["duration"], 0);
        assert_eq!(json["data"]["meta"]["note"], "");
        assert_eq!(json["data"]["meta"]["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_links_self_field_rename() {
        let body = r#"{"self": "https://x?page[number]=1&", "last": null}"#;
        let links: NavigationLinks = serde_json::from_str(body).unwrap();
        assert!(links.current.is_some());
        assert!(links.last.is_none());
    }
}
