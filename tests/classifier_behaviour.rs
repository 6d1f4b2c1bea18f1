use std::path::Path;

use analog_meter_reader::dial_gen::{render_dial, DialStyle};
use analog_meter_reader::{
    classify_with_debug, DigitClassifier, GridMapping, MeterConfig, MeterError, NeedleChannel,
};
use image::{DynamicImage, Rgba, RgbaImage};

fn quad_mapping() -> GridMapping {
    GridMapping::from_entries([((1, 1), 1), ((2, 1), 2), ((1, 2), 3), ((2, 2), 4)]).unwrap()
}

fn quad_classifier() -> DigitClassifier {
    DigitClassifier::new(MeterConfig {
        mapping: quad_mapping(),
        ..MeterConfig::default()
    })
}

/// 20x20 grey image with the listed 10x10 quadrants painted reddish.
fn quadrants(red: &[(u32, u32)]) -> DynamicImage {
    let mut img = RgbaImage::from_pixel(20, 20, Rgba([100, 100, 100, 255]));
    for &(qx, qy) in red {
        for y in qy * 10..qy * 10 + 10 {
            for x in qx * 10..qx * 10 + 10 {
                img.put_pixel(x, y, Rgba([200, 50, 50, 255]));
            }
        }
    }
    DynamicImage::ImageRgba8(img)
}

#[test]
fn later_cell_wins_equal_scores() {
    let classifier = quad_classifier();
    assert_eq!(classifier.classify(&quadrants(&[(0, 0), (1, 1)])).unwrap(), 4);
    assert_eq!(classifier.classify(&quadrants(&[(0, 0), (1, 0)])).unwrap(), 2);
    assert_eq!(classifier.classify(&quadrants(&[(0, 0)])).unwrap(), 1);
}

#[test]
fn all_black_image_scores_zero() {
    let black = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255])));
    let (reading, record) = quad_classifier().read_with_debug(&black).unwrap();
    assert_eq!(reading.digit, 4);
    assert_eq!(reading.significance, 0.0);
    assert!(record.scores.iter().all(|s| s.significance == 0.0));
}

#[test]
fn debug_scores_are_sorted_descending() {
    let img = DynamicImage::ImageRgba8(render_dial(3, 200, 200, &DialStyle::default()));
    let (digit, record) = classify_with_debug(&img, NeedleChannel::Red).unwrap();
    assert_eq!(digit, 3);
    assert_eq!(record.scores[0].digit, 3);
    assert!(
        record
            .scores
            .windows(2)
            .all(|w| w[0].significance >= w[1].significance)
    );
}

#[test]
fn debug_ties_keep_scan_order() {
    let grey = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([80, 80, 80, 255])));
    let (_, record) = DigitClassifier::default().classify_with_debug(&grey).unwrap();

    let mapping = GridMapping::reference();
    let mut expected = Vec::new();
    for y in 1..=mapping.grid_size() {
        for x in 1..=mapping.grid_size() {
            if mapping.digit_at(x, y).is_some() {
                expected.push((x, y));
            }
        }
    }
    let order: Vec<_> = record.scores.iter().map(|s| (s.x_step, s.y_step)).collect();
    assert_eq!(order, expected);
}

#[test]
fn debug_overlay_can_be_saved() {
    let img = DynamicImage::ImageRgba8(render_dial(7, 95, 95, &DialStyle::default()));
    let (_, record) = DigitClassifier::default().classify_with_debug(&img).unwrap();
    assert_eq!(record.overlay.dimensions(), (100, 100));

    let out = std::env::temp_dir().join("analog_meter_reader_overlay_test.png");
    record.save_overlay(&out).expect("failed to write overlay");
    let reloaded = image::open(&out).expect("failed to reopen overlay");
    assert_eq!(reloaded.to_rgba8().dimensions(), (100, 100));
    std::fs::remove_file(&out).ok();
}

#[test]
fn empty_mapping_reports_no_scored_cells() {
    let classifier = DigitClassifier::new(MeterConfig {
        mapping: GridMapping::empty(),
        ..MeterConfig::default()
    });
    let img = DynamicImage::ImageRgba8(render_dial(0, 50, 50, &DialStyle::default()));
    assert!(matches!(classifier.classify(&img), Err(MeterError::NoScoredCells)));
    assert!(matches!(classifier.classify_with_debug(&img), Err(MeterError::NoScoredCells)));
}

#[test]
fn zero_area_image_is_invalid() {
    let err = DigitClassifier::default()
        .classify(&DynamicImage::new_rgb8(0, 0))
        .unwrap_err();
    assert!(matches!(err, MeterError::InvalidImage { .. }));
}

#[test]
fn unknown_channel_is_rejected() {
    assert!(matches!("purple".parse::<NeedleChannel>(), Err(MeterError::InvalidChannel(_))));
}

#[test]
fn missing_file_is_a_decode_error() {
    let err = DigitClassifier::default()
        .classify_path(Path::new("does/not/exist.png"))
        .unwrap_err();
    assert!(matches!(err, MeterError::Decode { .. }));
}

#[test]
fn custom_mapping_from_json() {
    let mapping = GridMapping::from_json_str(r#"{"1": {"1": 7, "2": 8}, "2": {"1": 9, "2": 0}}"#)
        .unwrap();
    let classifier = DigitClassifier::new(MeterConfig {
        mapping,
        ..MeterConfig::default()
    });
    assert_eq!(classifier.classify(&quadrants(&[(1, 0)])).unwrap(), 9);
    assert_eq!(classifier.classify(&quadrants(&[(0, 1)])).unwrap(), 8);
}
