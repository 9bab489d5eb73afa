use atlas_pager_core::config::{PagerConfig, SortOrder};
use atlas_pager_core::error::AtlasError;

/// Test zero-sized page dimensions
#[test]
fn test_zero_width() {
    let cfg = PagerConfig {
        page_width: 0,
        page_height: 1024,
        ..Default::default()
    };

    match cfg.validate() {
        Err(AtlasError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0);
            assert_eq!(height, 1024);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_negative_height() {
    let cfg = PagerConfig {
        page_width: 1024,
        page_height: -4,
        ..Default::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(AtlasError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_negative_padding() {
    let cfg = PagerConfig {
        padding: -1,
        ..Default::default()
    };
    match cfg.validate() {
        Err(AtlasError::InvalidConfig(msg)) => assert!(msg.contains("padding")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

/// Overlap as large as the page would keep fragmentation from advancing
#[test]
fn test_overlap_must_be_smaller_than_page() {
    let cfg = PagerConfig {
        page_width: 512,
        page_height: 256,
        fragment_overlap: 256,
        ..Default::default()
    };
    match cfg.validate() {
        Err(AtlasError::InvalidConfig(msg)) => assert!(msg.contains("fragment_overlap")),
        _ => panic!("Expected InvalidConfig error"),
    }

    let ok = PagerConfig {
        fragment_overlap: 255,
        ..cfg
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn test_negative_overlap() {
    let cfg = PagerConfig {
        fragment_overlap: -2,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_non_positive_max_size() {
    let cfg = PagerConfig {
        max_size: Some((0, 64)),
        ..Default::default()
    };
    assert!(matches!(cfg.validate(), Err(AtlasError::InvalidConfig(_))));
}

#[test]
fn test_effective_max_size_clamps() {
    let cfg = PagerConfig::builder()
        .with_page_size(1024, 512)
        .max_size(Some((4096, 128)))
        .build();
    assert_eq!(cfg.effective_max_size(), (1024, 128));

    let unset = PagerConfig::builder().with_page_size(300, 200).build();
    assert_eq!(unset.effective_max_size(), (300, 200));
}

#[test]
fn test_defaults() {
    let cfg = PagerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.padding, 1);
    assert_eq!(cfg.page_size(), (2048, 2048));
    assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
}

#[test]
fn test_sort_order_parse() {
    assert_eq!("area_desc".parse::<SortOrder>(), Ok(SortOrder::AreaDesc));
    assert_eq!("MAX_SIDE_DESC".parse::<SortOrder>(), Ok(SortOrder::MaxSideDesc));
    assert_eq!("none".parse::<SortOrder>(), Ok(SortOrder::None));
    assert!("name_asc".parse::<SortOrder>().is_err());
}

#[test]
fn test_config_serde_defaults() {
    let cfg: PagerConfig = serde_json::from_str(
        r#"{"page_width": 512, "page_height": 512, "padding": 0, "fragment_overlap": 4}"#,
    )
    .expect("parse");
    assert_eq!(cfg.max_size, None);
    assert!(!cfg.merge_overlapping);
    assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
}
