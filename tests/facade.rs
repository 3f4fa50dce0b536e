use gerberfill::{init_logging, ConversionConfig, RegionConverter, RegionLayout, Unit};
use tempfile::TempDir;

#[test]
fn test_init_logging_twice() {
    init_logging().unwrap();
    init_logging().unwrap();
}

#[test]
fn test_convert_through_facade() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("edge_cuts.gbr");
    let output = dir.path().join("regions").join("edge_cuts.gbr");
    std::fs::write(
        &input,
        "%FSLAX35Y35*%\n%MOMM*%\nX0Y0D02*\nX1000000Y0D01*\nY500000D01*\nX0D01*\nY0D01*\n\
         X2000000Y0D02*\nX2500000D01*\nY500000D01*\nX2000000Y0D01*\nM02*\n",
    )
    .unwrap();

    let config = ConversionConfig {
        region_layout: RegionLayout::Single,
        ..ConversionConfig::default()
    };
    let summary = RegionConverter::new(config)
        .convert_file(&input, &output)
        .unwrap();

    assert_eq!(summary.num_closed_polygons, 2);
    assert_eq!(summary.unit, Unit::Millimeters);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.matches("G36*").count(), 1);
    assert_eq!(written.matches("D02*").count(), 2);
    assert!(written.ends_with("G37*\nM02*\n"));
}

#[test]
fn test_version_constants() {
    assert!(!gerberfill::VERSION.is_empty());
    assert!(gerberfill::BUILD_DATE.ends_with("UTC"));
}
