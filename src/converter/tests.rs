//! Tests for directory compilation and dat decompilation.

use super::*;
use crate::schema::domain::{Attribute, Type};
use crate::schema::{Cidr, Domain, GeoIp, GeoIpList, GeoSite, GeoSiteList};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use tempfile::tempdir;

fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn read_dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Compile
// ============================================================================

#[test]
fn test_build_site_list_groups_by_file() {
    let dir = tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("us", "google.com\n\nfacebook.com\n"),
            ("cn", "baidu.com\r\nqq.com"),
        ],
    );

    let list = build_list::<Sites>(dir.path()).unwrap();

    assert_eq!(list.entry.len(), 2);
    assert_eq!(list.entry[0].country_code, "CN");
    assert_eq!(list.entry[1].country_code, "US");

    let values: Vec<&str> = list.entry[1].domain.iter().map(|d| d.value.as_str()).collect();
    assert_eq!(values, vec!["google.com", "facebook.com"]);

    for site in &list.entry {
        for domain in &site.domain {
            assert_eq!(domain.r#type(), Type::Domain);
            assert!(domain.attribute.is_empty());
        }
    }
    assert_eq!(list.entry[0].domain[0].value, "baidu.com");
}

#[test]
fn test_site_lines_are_not_parsed() {
    let dir = tempdir().unwrap();
    write_files(dir.path(), &[("cn", "full:example.com:@ads\n")]);

    let list = build_list::<Sites>(dir.path()).unwrap();
    let domain = &list.entry[0].domain[0];

    assert_eq!(domain.r#type(), Type::Domain);
    assert_eq!(domain.value, "full:example.com:@ads");
    assert!(domain.attribute.is_empty());
}

#[test]
fn test_build_ip_list_normalizes() {
    let dir = tempdir().unwrap();
    write_files(
        dir.path(),
        &[("cn", "10.0.0.5\n192.168.7.9/16\n2001:db8::1/32\n")],
    );

    let list = build_list::<Ips>(dir.path()).unwrap();
    let cidrs = &list.entry[0].cidr;

    assert_eq!(list.entry[0].country_code, "CN");
    assert_eq!(cidrs.len(), 3);
    assert_eq!(cidrs[0].ip, vec![10, 0, 0, 5]);
    assert_eq!(cidrs[0].prefix, 32);
    assert_eq!(cidrs[1].ip, vec![192, 168, 0, 0]);
    assert_eq!(cidrs[1].prefix, 16);
    assert_eq!(cidrs[2].ip.len(), 16);
    assert_eq!(cidrs[2].prefix, 32);
}

#[test]
fn test_invalid_cidr_reports_file_and_line() {
    let dir = tempdir().unwrap();
    write_files(dir.path(), &[("cn", "10.0.0.0/8\nnot-an-ip\n")]);

    let err = compile_dir::<Ips>(dir.path()).unwrap_err();
    match &err {
        Error::InvalidCidr { path, line, source } => {
            assert_eq!(path, &dir.path().join("cn"));
            assert_eq!(*line, 2);
            assert_eq!(
                source,
                &crate::error::CidrRuleError::InvalidCidr("not-an-ip/32".to_string())
            );
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("not-an-ip"));
}

#[test]
fn test_bare_ipv6_line_gets_slash_32() {
    let dir = tempdir().unwrap();
    write_files(dir.path(), &[("cn", "2001:db8::1\n")]);

    let list = build_list::<Ips>(dir.path()).unwrap();
    let cidr = &list.entry[0].cidr[0];

    assert_eq!(cidr.prefix, 32);
    assert_eq!(cidr.ip, vec![0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_blank_ip_line_is_invalid_cidr() {
    let dir = tempdir().unwrap();
    write_files(dir.path(), &[("cn", "10.0.0.0/8\n\n")]);

    let err = compile_dir::<Ips>(dir.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidCidr { line: 2, .. }));
}

#[test]
fn test_padded_ip_line_is_invalid_cidr() {
    let dir = tempdir().unwrap();
    write_files(dir.path(), &[("cn", "10.0.0.0/8 \n")]);

    let err = compile_dir::<Ips>(dir.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidCidr { line: 1, .. }));
}

#[test]
fn test_empty_dir_compiles_to_empty_list() {
    let dir = tempdir().unwrap();

    let data = compile_dir::<Sites>(dir.path()).unwrap();
    assert!(data.is_empty());
    assert!(decode_list::<Sites>(&data).unwrap().entry.is_empty());
}

#[test]
fn test_missing_dir_is_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = compile_dir::<Sites>(&missing).unwrap_err();
    assert!(matches!(err, Error::Io { action: "read dir", .. }));
    assert!(!err.is_decode());
}

#[test]
fn test_subdirectories_are_skipped() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_files(dir.path(), &[("jp", "example.jp\n")]);

    let list = build_list::<Sites>(dir.path()).unwrap();
    assert_eq!(list.entry.len(), 1);
    assert_eq!(list.entry[0].country_code, "JP");
}

// ============================================================================
// Decompile
// ============================================================================

#[test]
fn test_render_site_files() {
    let mut tagged = Domain::suffix("example.com");
    tagged.attribute = vec![Attribute::new("ads"), Attribute::new("track")];

    let list = GeoSiteList {
        entry: vec![GeoSite {
            country_code: "CN".to_string(),
            domain: vec![
                Domain::suffix("baidu.com"),
                Domain::with_type(Type::Full, "www.qq.com"),
                Domain::with_type(Type::Plain, ""),
                Domain::with_type(Type::Regex, "^ad\\."),
                Domain::with_type(Type::Plain, "taobao"),
                tagged,
            ],
        }],
    };

    let files = render_files::<Sites>(&list).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "cn");
    assert_eq!(
        files[0].1,
        "domain:baidu.com\n\
         full:www.qq.com\n\
         regexp:^ad\\.\n\
         keyword:taobao\n\
         domain:example.com:@ads,@track\n"
    );
}

#[test]
fn test_render_ip_files() {
    let list = GeoIpList {
        entry: vec![GeoIp {
            country_code: "PRIVATE".to_string(),
            cidr: vec![
                Cidr::from_net("10.0.0.0/8".parse().unwrap()),
                Cidr::from_net("fc00::/7".parse().unwrap()),
            ],
        }],
    };

    let files = render_files::<Ips>(&list).unwrap();
    assert_eq!(files, vec![("private".to_string(), "10.0.0.0/8\nfc00::/7\n".to_string())]);
}

#[test]
fn test_duplicate_country_codes_share_a_file() {
    let list = GeoSiteList {
        entry: vec![
            GeoSite {
                country_code: "CN".to_string(),
                domain: vec![Domain::suffix("a.cn")],
            },
            GeoSite {
                country_code: "US".to_string(),
                domain: vec![Domain::suffix("a.us")],
            },
            GeoSite {
                country_code: "cn".to_string(),
                domain: vec![Domain::suffix("b.cn")],
            },
        ],
    };

    let files = render_files::<Sites>(&list).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0], ("cn".to_string(), "domain:a.cn\ndomain:b.cn\n".to_string()));
    assert_eq!(files[1], ("us".to_string(), "domain:a.us\n".to_string()));
}

#[test]
fn test_decompile_writes_lowercase_files() {
    let list = GeoSiteList {
        entry: vec![
            GeoSite {
                country_code: "CN".to_string(),
                domain: vec![Domain::suffix("baidu.com")],
            },
            GeoSite {
                country_code: "GEOLOCATION-!CN".to_string(),
                domain: vec![Domain::with_type(Type::Full, "www.google.com")],
            },
        ],
    };
    let data = encode(&list).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("out").join("sites");
    let written = decompile::<Sites>(&data, &out).unwrap();

    assert_eq!(written, 2);
    assert_eq!(read_dir_names(&out), vec!["cn", "geolocation-!cn"]);
    assert_eq!(fs::read_to_string(out.join("cn")).unwrap(), "domain:baidu.com\n");
}

#[test]
fn test_decompile_empty_list_writes_nothing() {
    let dir = tempdir().unwrap();
    let data = encode(&GeoIpList::default()).unwrap();

    assert_eq!(decompile::<Ips>(&data, dir.path()).unwrap(), 0);
    assert!(read_dir_names(dir.path()).is_empty());
}

#[test]
fn test_decompile_garbage_is_decode_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    let err = decompile::<Sites>(&[0xff, 0xff, 0xff], &out).unwrap_err();
    assert!(matches!(err, Error::Decode { what: "geosite", .. }));
    assert!(err.is_decode());
    assert!(!out.exists());
}

#[test]
fn test_unusable_country_code_writes_nothing() {
    let list = GeoIpList {
        entry: vec![
            GeoIp {
                country_code: "CN".to_string(),
                cidr: vec![Cidr::from_net("1.0.1.0/24".parse().unwrap())],
            },
            GeoIp {
                country_code: "../ESCAPE".to_string(),
                cidr: Vec::new(),
            },
        ],
    };
    let data = encode(&list).unwrap();

    let dir = tempdir().unwrap();
    let err = decompile::<Ips>(&data, dir.path()).unwrap_err();

    assert!(matches!(err, Error::Malformed { .. }));
    assert!(read_dir_names(dir.path()).is_empty());
}

#[test]
fn test_malformed_cidr_aborts_before_writing() {
    let list = GeoIpList {
        entry: vec![
            GeoIp {
                country_code: "CN".to_string(),
                cidr: vec![Cidr::from_net("1.0.1.0/24".parse().unwrap())],
            },
            GeoIp {
                country_code: "US".to_string(),
                cidr: vec![Cidr {
                    ip: vec![1, 2, 3, 4, 5],
                    prefix: 8,
                }],
            },
        ],
    };
    let data = encode(&list).unwrap();

    let dir = tempdir().unwrap();
    let err = decompile::<Ips>(&data, dir.path()).unwrap_err();

    assert!(err.is_decode());
    assert!(err.to_string().contains("US"));
    assert!(read_dir_names(dir.path()).is_empty());
}

#[test]
fn test_decompile_gzip_input() {
    let list = GeoSiteList {
        entry: vec![GeoSite {
            country_code: "CN".to_string(),
            domain: vec![Domain::suffix("baidu.com")],
        }],
    };
    let raw = encode(&list).unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    let compressed = encoder.finish().unwrap();

    assert_eq!(decode_list::<Sites>(&compressed).unwrap(), list);
}

#[test]
fn test_truncated_gzip_is_decode_error() {
    let err = decode_list::<Sites>(&[0x1f, 0x8b, 0x08]).unwrap_err();
    assert!(matches!(err, Error::Gzip(_)));
    assert!(err.is_decode());
}

// ============================================================================
// Dat files
// ============================================================================

#[test]
fn test_write_dat_replaces_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("geosite.dat");
    fs::write(&path, b"old content").unwrap();

    write_dat(&path, &[1, 2, 3]).unwrap();

    assert_eq!(read_dat(&path).unwrap(), vec![1, 2, 3]);
    assert_eq!(read_dir_names(dir.path()), vec!["geosite.dat"]);
}

#[test]
fn test_failed_write_dat_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("geosite.dat");
    fs::create_dir(&path).unwrap();

    let err = write_dat(&path, &[1, 2, 3]).unwrap_err();

    assert!(matches!(err, Error::Io { action: "replace", .. }));
    assert_eq!(read_dir_names(dir.path()), vec!["geosite.dat"]);
    assert!(path.is_dir());
}

#[test]
fn test_read_missing_dat_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_dat(&dir.path().join("geoip.dat")).unwrap_err();
    assert!(matches!(err, Error::Io { action: "read", .. }));
}

#[test]
fn test_write_checksum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("geoip.dat");

    let sum_path = write_checksum(&path, b"").unwrap();

    assert_eq!(sum_path, dir.path().join("geoip.dat.sha256sum"));
    assert_eq!(
        fs::read_to_string(sum_path).unwrap(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855  geoip.dat\n"
    );
}
