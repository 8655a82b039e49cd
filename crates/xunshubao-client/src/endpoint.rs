use std::fmt;

use xunshubao_core::AlgorithmSuite;

/// Remote operations exposed by the V3 API.
///
/// Every endpoint shares the same envelope round trip; the variants differ
/// only in request path and algorithm pairing, so one parameterized call
/// replaces the per-endpoint copies of the original client. Company-facing
/// endpoints and the data-detail lookup use the MD5/AES pairing, person
/// endpoints the SM3/SM4 national-standard pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Enforcement-disclosure verification, company subject.
    ZxgkCheckCompany,
    /// Enforcement-disclosure verification, person subject.
    ZxgkCheckPerson,
    /// Bad-credit (dishonest judgment debtor) verification, company subject.
    ShixinCheckCompany,
    /// Bad-credit verification, person subject.
    ShixinCheckPerson,
    /// Consumption-restriction verification, company subject.
    XglCheckCompany,
    /// Consumption-restriction verification, person subject.
    XglCheckPerson,
    /// Enforced-debtor verification, company subject.
    ZhixingCheckCompany,
    /// Enforced-debtor verification, person subject.
    ZhixingCheckPerson,
    /// Case-closure (terminated enforcement) verification, company subject.
    ZhongbenCheckCompany,
    /// Case-closure verification, person subject.
    ZhongbenCheckPerson,
    /// Enforcement-disclosure record query, company subject.
    ZxgkQueryCompany,
    /// Enforcement-disclosure record query, person subject.
    ZxgkQueryPerson,
    /// Detail lookup for a single judicial data record.
    SifaDataInfo,
}

impl Endpoint {
    /// All endpoints, in the order the service documentation lists them.
    pub const ALL: [Endpoint; 13] = [
        Endpoint::ZxgkCheckCompany,
        Endpoint::ZxgkCheckPerson,
        Endpoint::ShixinCheckCompany,
        Endpoint::ShixinCheckPerson,
        Endpoint::XglCheckCompany,
        Endpoint::XglCheckPerson,
        Endpoint::ZhixingCheckCompany,
        Endpoint::ZhixingCheckPerson,
        Endpoint::ZhongbenCheckCompany,
        Endpoint::ZhongbenCheckPerson,
        Endpoint::ZxgkQueryCompany,
        Endpoint::ZxgkQueryPerson,
        Endpoint::SifaDataInfo,
    ];

    /// Returns the request path relative to the API base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::ZxgkCheckCompany => "/v3/zxgkcheck/company",
            Self::ZxgkCheckPerson => "/v3/zxgkcheck/person",
            Self::ShixinCheckCompany => "/v3/shixincheck/company",
            Self::ShixinCheckPerson => "/v3/shixincheck/person",
            Self::XglCheckCompany => "/v3/xglcheck/company",
            Self::XglCheckPerson => "/v3/xglcheck/person",
            Self::ZhixingCheckCompany => "/v3/zhixingcheck/company",
            Self::ZhixingCheckPerson => "/v3/zhixingcheck/person",
            Self::ZhongbenCheckCompany => "/v3/zhongbencheck/company",
            Self::ZhongbenCheckPerson => "/v3/zhongbencheck/person",
            Self::ZxgkQueryCompany => "/v3/zxgkquery/company",
            Self::ZxgkQueryPerson => "/v3/zxgkquery/person",
            Self::SifaDataInfo => "/v3/sifa/datainfo",
        }
    }

    /// Returns the algorithm pairing this endpoint is documented to use.
    #[must_use]
    pub fn suite(self) -> AlgorithmSuite {
        match self {
            Self::ZxgkCheckCompany
            | Self::ShixinCheckCompany
            | Self::XglCheckCompany
            | Self::ZhixingCheckCompany
            | Self::ZhongbenCheckCompany
            | Self::ZxgkQueryCompany
            | Self::SifaDataInfo => AlgorithmSuite::Md5Aes,
            Self::ZxgkCheckPerson
            | Self::ShixinCheckPerson
            | Self::XglCheckPerson
            | Self::ZhixingCheckPerson
            | Self::ZhongbenCheckPerson
            | Self::ZxgkQueryPerson => AlgorithmSuite::Sm3Sm4,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
