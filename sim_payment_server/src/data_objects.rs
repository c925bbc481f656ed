use actix_web::{http::Method, web::Bytes, HttpRequest};
use url::form_urlencoded;

/// The parameters of a provider callback, lifted off the wire without interpretation.
///
/// `out_sum` and `inv_id` stay raw strings here: the signature is computed over the received bytes, so parsing or
/// re-formatting them before verification would break the check.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub out_sum: String,
    pub inv_id: String,
    pub signature: String,
    /// Every `Shp_*`/`shp_*` pair, verbatim and in arrival order. Sorting happens inside the signature check.
    pub passthrough: Vec<(String, String)>,
}

impl CallbackParams {
    /// Extracts callback parameters method-agnostically: the query string for GET requests, the urlencoded body
    /// for everything else, as the provider may deliver either.
    pub fn from_request(req: &HttpRequest, body: &Bytes) -> Self {
        if req.method() == &Method::GET {
            Self::from_pairs(form_urlencoded::parse(req.query_string().as_bytes()))
        } else {
            Self::from_pairs(form_urlencoded::parse(body))
        }
    }

    fn from_pairs<'a>(pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "OutSum" => params.out_sum = value.into_owned(),
                "InvId" => params.inv_id = value.into_owned(),
                "SignatureValue" => params.signature = value.into_owned(),
                k if k.starts_with("Shp_") || k.starts_with("shp_") => {
                    params.passthrough.push((key.into_owned(), value.into_owned()));
                },
                _ => {},
            }
        }
        params
    }
}
