//! Request normalization.
//!
//! The generic verb API accepts several call shapes: nothing, bare data, a
//! pre-built options bag, or data plus an options overlay. This module turns
//! every shape into one canonical [`RequestSpec`] before anything touches the
//! network.
//!
//! The JavaScript predecessor detected an options bag by probing for the keys
//! `qs` / `body` / `headers` / `json`; here the distinction is a plain enum
//! ([`Arg`]) so no shape inspection is needed.
//!
//! Precedence is a defaults-merge, not an overwrite: fields explicitly set on
//! an options overlay always win, and values derived from bare data only fill
//! keys the overlay left unset. See [`RequestOptions::or_defaults`].

use reqwest::Method;
use serde_json::Value;

use crate::error::Error;
use crate::types::QueryMap;

/// Header map for per-request header overrides.
pub type HeaderMap = std::collections::BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Canonical request shape
// ---------------------------------------------------------------------------

/// Payload of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON with a JSON content type.
    Json(Value),
    /// Sent verbatim.
    Raw(Vec<u8>),
}

/// The single canonical request shape handed to the transport.
///
/// Invariant: `path` is non-empty; [`normalize`] rejects anything else before
/// a spec is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured base URL.
    pub path: String,
    /// Query-string parameters.
    pub query: QueryMap,
    /// Per-request header overrides.
    pub headers: HeaderMap,
    /// Request payload, if any.
    pub body: Option<RequestBody>,
    /// Whether the response body should be JSON-decoded.
    pub parse_json: bool,
}

// ---------------------------------------------------------------------------
// Options bag
// ---------------------------------------------------------------------------

/// Explicit request options, each field optional.
///
/// Every field set here wins over anything derived from positional data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query-string parameters.
    pub qs: Option<QueryMap>,
    /// Request payload.
    pub body: Option<RequestBody>,
    /// Header overrides.
    pub headers: Option<HeaderMap>,
    /// `false` sends the body verbatim and skips JSON-decoding the response.
    /// Unset defaults to `true`.
    pub json: Option<bool>,
}

impl RequestOptions {
    /// Options with only a query string set.
    pub fn query(qs: QueryMap) -> Self {
        Self {
            qs: Some(qs),
            ..Self::default()
        }
    }

    /// Options with only a JSON body set.
    pub fn json_body(body: Value) -> Self {
        Self {
            body: Some(RequestBody::Json(body)),
            ..Self::default()
        }
    }

    /// Sets the `json` flag, returning the modified options.
    pub fn parse_json(mut self, parse: bool) -> Self {
        self.json = Some(parse);
        self
    }

    /// Sets header overrides, returning the modified options.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the query string, returning the modified options.
    pub fn with_query(mut self, qs: QueryMap) -> Self {
        self.qs = Some(qs);
        self
    }

    /// Fills every unset field from `defaults`.
    ///
    /// This is the precedence rule of the whole normalization layer: explicit
    /// fields on `self` always win, derived values only plug gaps.
    pub fn or_defaults(mut self, defaults: RequestOptions) -> Self {
        if self.qs.is_none() {
            self.qs = defaults.qs;
        }
        if self.body.is_none() {
            self.body = defaults.body;
        }
        if self.headers.is_none() {
            self.headers = defaults.headers;
        }
        if self.json.is_none() {
            self.json = defaults.json;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Call arguments
// ---------------------------------------------------------------------------

/// Raw data passed positionally to a verb method.
#[derive(Debug, Clone, PartialEq)]
pub enum CallData {
    /// A JSON value; objects and arrays become JSON payloads (or query
    /// strings for the query verb family), anything else is sent verbatim.
    Value(Value),
    /// An opaque byte payload, sent verbatim.
    Bytes(Vec<u8>),
}

/// One positional argument following the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bare data, interpreted per verb family.
    Data(CallData),
    /// A pre-built options bag.
    Options(RequestOptions),
}

/// The positional arguments of one verb call.
///
/// At most two are meaningful (data plus an options overlay); more than two
/// is rejected by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(pub Vec<Arg>);

impl From<()> for CallArgs {
    fn from(_: ()) -> Self {
        Self(Vec::new())
    }
}

impl From<Value> for CallArgs {
    fn from(data: Value) -> Self {
        Self(vec![Arg::Data(CallData::Value(data))])
    }
}

impl From<Vec<u8>> for CallArgs {
    fn from(data: Vec<u8>) -> Self {
        Self(vec![Arg::Data(CallData::Bytes(data))])
    }
}

impl From<RequestOptions> for CallArgs {
    fn from(options: RequestOptions) -> Self {
        Self(vec![Arg::Options(options)])
    }
}

impl From<(Value, RequestOptions)> for CallArgs {
    fn from((data, options): (Value, RequestOptions)) -> Self {
        Self(vec![
            Arg::Data(CallData::Value(data)),
            Arg::Options(options),
        ])
    }
}

impl From<Vec<Arg>> for CallArgs {
    fn from(args: Vec<Arg>) -> Self {
        Self(args)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Which verb family a request belongs to, deciding how bare data is
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerbFamily {
    /// GET: bare data becomes the query string.
    Query,
    /// POST / PUT / DELETE: bare data becomes the payload.
    Body,
}

impl VerbFamily {
    pub(crate) fn of(method: &Method) -> Self {
        if *method == Method::GET {
            Self::Query
        } else {
            Self::Body
        }
    }
}

/// Builds the canonical [`RequestSpec`] for one verb call.
///
/// Fails with [`Error::Validation`] for an empty endpoint, more than two
/// positional arguments, or data the verb family cannot interpret. Never
/// performs I/O.
pub(crate) fn normalize(
    method: Method,
    endpoint: &str,
    args: CallArgs,
) -> Result<RequestSpec, Error> {
    if endpoint.is_empty() {
        return Err(Error::validation("endpoint must not be empty"));
    }
    if args.0.len() > 2 {
        return Err(Error::validation("Too many arguments passed to client"));
    }

    let family = VerbFamily::of(&method);
    let mut args = args.0.into_iter();
    let options = match args.next() {
        None => RequestOptions::default(),
        // A leading options bag is used as-is; anything after it is ignored,
        // matching the behaviour callers already rely on.
        Some(Arg::Options(options)) => options,
        Some(Arg::Data(data)) => {
            let derived = derive_defaults(family, data)?;
            match args.next() {
                None => derived,
                Some(Arg::Options(overlay)) => overlay.or_defaults(derived),
                Some(Arg::Data(_)) => {
                    return Err(Error::validation(
                        "expected request options as the second argument",
                    ));
                }
            }
        }
    };

    Ok(finalize(method, endpoint, options))
}

/// Derives default request options from bare positional data.
fn derive_defaults(family: VerbFamily, data: CallData) -> Result<RequestOptions, Error> {
    match family {
        VerbFamily::Query => match data {
            CallData::Value(Value::Object(map)) => {
                let mut qs = QueryMap::new();
                for (key, value) in map {
                    qs.insert(key, scalar_to_string(&value));
                }
                Ok(RequestOptions::query(qs))
            }
            CallData::Value(Value::Null) => Ok(RequestOptions::default()),
            _ => Err(Error::validation("query data must be an object")),
        },
        VerbFamily::Body => match data {
            // Mappings and sequences are JSON payloads with JSON responses.
            CallData::Value(value @ (Value::Object(_) | Value::Array(_))) => {
                Ok(RequestOptions::json_body(value))
            }
            CallData::Value(Value::Null) => Ok(RequestOptions::default()),
            // Everything else goes over the wire verbatim, and the response
            // is not JSON-decoded either.
            CallData::Value(Value::String(s)) => Ok(RequestOptions {
                body: Some(RequestBody::Raw(s.into_bytes())),
                json: Some(false),
                ..RequestOptions::default()
            }),
            CallData::Value(other) => Ok(RequestOptions {
                body: Some(RequestBody::Raw(other.to_string().into_bytes())),
                json: Some(false),
                ..RequestOptions::default()
            }),
            CallData::Bytes(bytes) => Ok(RequestOptions {
                body: Some(RequestBody::Raw(bytes)),
                json: Some(false),
                ..RequestOptions::default()
            }),
        },
    }
}

/// Collapses merged options into the final request spec.
fn finalize(method: Method, endpoint: &str, options: RequestOptions) -> RequestSpec {
    let parse_json = options.json.unwrap_or(true);
    let body = options.body.map(|body| match body {
        // With `json: false` a JSON payload is downgraded to its literal
        // text so nothing re-encodes or re-decodes it.
        RequestBody::Json(value) if !parse_json => RequestBody::Raw(literal_bytes(value)),
        other => other,
    });

    RequestSpec {
        method,
        path: endpoint.to_string(),
        query: options.qs.unwrap_or_default(),
        headers: options.headers.unwrap_or_default(),
        body,
        parse_json,
    }
}

/// The literal byte representation of a JSON value: strings are unquoted,
/// everything else is compact JSON text.
fn literal_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

/// Query-string rendering of a scalar JSON value.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = normalize(Method::GET, "", CallArgs::from(())).unwrap_err();
        assert_eq!(err.to_string(), "endpoint must not be empty");
    }

    #[test]
    fn more_than_two_arguments_is_rejected() {
        let args = CallArgs(vec![
            Arg::Data(CallData::Value(json!("a"))),
            Arg::Options(RequestOptions::default()),
            Arg::Options(RequestOptions::default()),
        ]);
        let err = normalize(Method::GET, "/hi", args).unwrap_err();
        assert_eq!(err.to_string(), "Too many arguments passed to client");
    }

    #[test]
    fn bare_get_has_no_query_and_parses_json() {
        let spec = normalize(Method::GET, "/jobs", CallArgs::from(())).unwrap();
        assert!(spec.query.is_empty());
        assert!(spec.body.is_none());
        assert!(spec.parse_json);
    }

    #[test]
    fn get_data_becomes_query_string() {
        let spec = normalize(
            Method::GET,
            "/hello",
            CallArgs::from(json!({ "hello": true, "size": 10 })),
        )
        .unwrap();
        assert_eq!(spec.query.get("hello").map(String::as_str), Some("true"));
        assert_eq!(spec.query.get("size").map(String::as_str), Some("10"));
    }

    #[test]
    fn get_with_non_object_data_is_rejected() {
        let err = normalize(Method::GET, "/hello", CallArgs::from(json!("nope"))).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn post_object_becomes_json_body() {
        let spec = normalize(Method::POST, "/hello", CallArgs::from(json!({ "a": 1 }))).unwrap();
        assert_eq!(spec.body, Some(RequestBody::Json(json!({ "a": 1 }))));
        assert!(spec.parse_json);
    }

    #[test]
    fn post_array_becomes_json_body() {
        let spec = normalize(Method::POST, "/hello", CallArgs::from(json!([1, 2]))).unwrap();
        assert_eq!(spec.body, Some(RequestBody::Json(json!([1, 2]))));
        assert!(spec.parse_json);
    }

    #[test]
    fn post_string_becomes_raw_body_without_json() {
        let spec = normalize(Method::POST, "/hello", CallArgs::from(json!("hello"))).unwrap();
        assert_eq!(spec.body, Some(RequestBody::Raw(b"hello".to_vec())));
        assert!(!spec.parse_json);
    }

    #[test]
    fn post_bytes_become_raw_body_without_json() {
        let spec = normalize(
            Method::POST,
            "/assets",
            CallArgs::from(vec![0u8, 159, 146, 150]),
        )
        .unwrap();
        assert_eq!(spec.body, Some(RequestBody::Raw(vec![0u8, 159, 146, 150])));
        assert!(!spec.parse_json);
    }

    #[test]
    fn explicit_overlay_fields_win_over_derived_defaults() {
        // The critical precedence property: `json: false` on the overlay must
        // downgrade the derived JSON payload to its literal text.
        let spec = normalize(
            Method::POST,
            "/x",
            CallArgs::from((json!({ "a": 1 }), RequestOptions::default().parse_json(false))),
        )
        .unwrap();
        assert_eq!(spec.body, Some(RequestBody::Raw(b"{\"a\":1}".to_vec())));
        assert!(!spec.parse_json);
    }

    #[test]
    fn derived_fields_fill_gaps_the_overlay_left_unset() {
        let overlay = RequestOptions::default().with_headers(HeaderMap::from([(
            "Some-Header".to_string(),
            "yes".to_string(),
        )]));
        let spec = normalize(
            Method::POST,
            "/x",
            CallArgs::from((json!({ "a": 1 }), overlay)),
        )
        .unwrap();
        // Derived body survives; explicit headers are applied.
        assert_eq!(spec.body, Some(RequestBody::Json(json!({ "a": 1 }))));
        assert_eq!(spec.headers.get("Some-Header").map(String::as_str), Some("yes"));
        assert!(spec.parse_json);
    }

    #[test]
    fn overlay_query_wins_over_derived_query() {
        let overlay =
            RequestOptions::query(QueryMap::from([("status".to_string(), "*".to_string())]));
        let spec = normalize(
            Method::GET,
            "/ex",
            CallArgs::from((json!({ "status": "running" }), overlay)),
        )
        .unwrap();
        assert_eq!(spec.query.get("status").map(String::as_str), Some("*"));
    }

    #[test]
    fn leading_options_bag_is_used_verbatim() {
        let options = RequestOptions::json_body(json!({ "hello": true }));
        let spec = normalize(Method::POST, "/hello", CallArgs::from(options)).unwrap();
        assert_eq!(spec.body, Some(RequestBody::Json(json!({ "hello": true }))));
        assert!(spec.parse_json);
    }

    #[test]
    fn options_bag_with_raw_body_skips_json() {
        let options = RequestOptions {
            body: Some(RequestBody::Raw(b"{\"hello\":true}".to_vec())),
            json: Some(false),
            ..RequestOptions::default()
        };
        let spec = normalize(Method::POST, "/hello", CallArgs::from(options)).unwrap();
        assert_eq!(spec.body, Some(RequestBody::Raw(b"{\"hello\":true}".to_vec())));
        assert!(!spec.parse_json);
    }

    #[test]
    fn or_defaults_is_a_gap_fill_not_an_overwrite() {
        let explicit = RequestOptions::query(QueryMap::from([(
            "a".to_string(),
            "explicit".to_string(),
        )]))
        .parse_json(false);
        let derived = RequestOptions::query(QueryMap::from([(
            "a".to_string(),
            "derived".to_string(),
        )]))
        .with_headers(HeaderMap::from([("H".to_string(), "1".to_string())]));

        let merged = explicit.or_defaults(derived);
        assert_eq!(
            merged.qs.unwrap().get("a").map(String::as_str),
            Some("explicit")
        );
        assert_eq!(merged.json, Some(false));
        // Headers were unset on the explicit side, so the derived value fills in.
        assert_eq!(
            merged.headers.unwrap().get("H").map(String::as_str),
            Some("1")
        );
    }
}
