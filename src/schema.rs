//! Protobuf messages of the geosite/geoip dat files.
//!
//! Field numbers and enum values match the router config schema consumed by
//! V2Ray-compatible cores, so artifacts written here load there and vice versa.

use ipnet::IpNet;
use std::net::IpAddr;

/// Domain for routing decision.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Domain {
    /// Domain matching type.
    #[prost(enumeration = "domain::Type", tag = "1")]
    pub r#type: i32,
    /// Domain value.
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
    /// Attributes of this domain. May be used for filtering.
    #[prost(message, repeated, tag = "3")]
    pub attribute: ::prost::alloc::vec::Vec<domain::Attribute>,
}

/// Nested message and enum types in `Domain`.
pub mod domain {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Attribute {
        #[prost(string, tag = "1")]
        pub key: ::prost::alloc::string::String,
        #[prost(oneof = "attribute::TypedValue", tags = "2, 3")]
        pub typed_value: ::core::option::Option<attribute::TypedValue>,
    }

    /// Nested message and enum types in `Attribute`.
    pub mod attribute {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum TypedValue {
            #[prost(bool, tag = "2")]
            BoolValue(bool),
            #[prost(int64, tag = "3")]
            IntValue(i64),
        }
    }

    /// Type of domain value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        /// The value is used as is (keyword match).
        Plain = 0,
        /// The value is used as a regular expression.
        Regex = 1,
        /// The value is a domain suffix.
        Domain = 2,
        /// The value is a full domain.
        Full = 3,
    }

    impl Attribute {
        /// Bare attribute with no typed value.
        pub fn new(key: impl Into<String>) -> Self {
            Self {
                key: key.into(),
                typed_value: None,
            }
        }
    }
}

impl Domain {
    /// Domain-suffix rule without attributes, the only kind the compiler emits.
    pub fn suffix(value: impl Into<String>) -> Self {
        Self::with_type(domain::Type::Domain, value)
    }

    /// Rule of the given type without attributes.
    pub fn with_type(kind: domain::Type, value: impl Into<String>) -> Self {
        Self {
            r#type: kind as i32,
            value: value.into(),
            attribute: Vec::new(),
        }
    }
}

/// IP for routing decision, in CIDR form.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Cidr {
    /// IP address, should be either 4 or 16 bytes.
    #[prost(bytes = "vec", tag = "1")]
    pub ip: ::prost::alloc::vec::Vec<u8>,
    /// Number of leading ones in the network mask.
    #[prost(uint32, tag = "2")]
    pub prefix: u32,
}

impl Cidr {
    /// Store a network as raw address bytes plus prefix length.
    pub fn from_net(net: IpNet) -> Self {
        let ip = match net.addr() {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        };
        Self {
            ip,
            prefix: u32::from(net.prefix_len()),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoIp {
    #[prost(string, tag = "1")]
    pub country_code: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub cidr: ::prost::alloc::vec::Vec<Cidr>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoIpList {
    #[prost(message, repeated, tag = "1")]
    pub entry: ::prost::alloc::vec::Vec<GeoIp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSite {
    #[prost(string, tag = "1")]
    pub country_code: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub domain: ::prost::alloc::vec::Vec<Domain>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSiteList {
    #[prost(message, repeated, tag = "1")]
    pub entry: ::prost::alloc::vec::Vec<GeoSite>,
}
