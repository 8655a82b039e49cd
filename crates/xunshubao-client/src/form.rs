use serde::Serialize;

/// Query form shared by the verification and query endpoints.
///
/// The service expects every field to be present, with empty strings for
/// unused criteria, so nothing is skipped during serialization. Fields are
/// documented in the V3 interface specification; `extra` is an opaque
/// passthrough echoed back unchanged by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    /// Person or company name.
    pub name: String,
    /// Identity document number, or its hash when `hash_param` is set.
    pub card_num: String,
    /// Name of the field submitted as a hash instead of plaintext.
    pub hash_param: String,
    /// Hash algorithm used for `hash_param` (the service accepts `SM3`).
    pub hash_type: String,
    pub data_type: String,
    pub publish_date: String,
    pub publish_from_date: String,
    pub publish_to_date: String,
    /// Whether delisted records are included.
    pub delist: String,
    /// Court case number, used by the query endpoints.
    pub case_code: String,
    pub page_no: u32,
    pub page_size: u32,
    pub extra: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            card_num: String::new(),
            hash_param: String::new(),
            hash_type: String::new(),
            data_type: String::new(),
            publish_date: String::new(),
            publish_from_date: String::new(),
            publish_to_date: String::new(),
            delist: String::new(),
            case_code: String::new(),
            page_no: 1,
            page_size: 10,
            extra: String::new(),
        }
    }
}

impl SearchForm {
    /// Starts a form for the given subject name with default pagination.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the identity document number in plaintext.
    #[must_use]
    pub fn with_card_num(mut self, card_num: impl Into<String>) -> Self {
        self.card_num = card_num.into();
        self
    }

    /// Submits the SM3 digest of the identity document number instead of the
    /// plaintext value, marking the field as hashed for the server.
    #[must_use]
    pub fn with_hashed_card_num(mut self, card_num: &str) -> Self {
        self.card_num = xunshubao_core::sm3_hex(card_num.as_bytes());
        self.hash_param = "cardNum".to_string();
        self.hash_type = "SM3".to_string();
        self
    }

    /// Sets the court case number for record queries.
    #[must_use]
    pub fn with_case_code(mut self, case_code: impl Into<String>) -> Self {
        self.case_code = case_code.into();
        self
    }

    /// Sets the page to fetch.
    #[must_use]
    pub fn with_page(mut self, page_no: u32, page_size: u32) -> Self {
        self.page_no = page_no;
        self.page_size = page_size;
        self
    }

    /// Restricts results to a publish-date range (inclusive, `yyyy-MM-dd`).
    #[must_use]
    pub fn with_publish_range(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.publish_from_date = from.into();
        self.publish_to_date = to.into();
        self
    }
}

/// Payload for the judicial data detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataInfoForm {
    /// Registry the record belongs to, e.g. `zhixing`.
    pub data_type: String,
    /// Record identifier returned by a previous query.
    pub data_id: String,
    pub extra: String,
}

impl DataInfoForm {
    #[must_use]
    pub fn new(data_type: impl Into<String>, data_id: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            data_id: data_id.into(),
            extra: String::new(),
        }
    }
}
