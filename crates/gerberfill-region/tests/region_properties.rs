use gerberfill_core::{AxisFormat, ZeroSuppression};
use gerberfill_region::codec::decode_value;
use gerberfill_region::winding::signed_area;
use gerberfill_region::{Point, RegionConverter};
use proptest::prelude::*;

const LAYOUT: AxisFormat = AxisFormat::new(2, 4);

fn triangle() -> impl Strategy<Value = [(i64, i64); 3]> {
    prop::array::uniform3((0i64..500_000, 0i64..500_000)).prop_filter(
        "triangle must have area",
        |[a, b, c]| ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)).abs() > 1_000_000,
    )
}

fn outline(triangles: &[[(i64, i64); 3]]) -> String {
    let mut text = String::from("%FSLAX24Y24*%\n%MOMM*%\n%ADD10C,0.1000*%\nD10*\nG01*\n");
    for [a, b, c] in triangles {
        text.push_str(&format!("X{}Y{}D02*\n", a.0, a.1));
        for p in [b, c, a] {
            text.push_str(&format!("X{}Y{}D01*\n", p.0, p.1));
        }
    }
    text.push_str("M02*\n");
    text
}

fn decode(token: &str) -> f64 {
    decode_value(token, LAYOUT, ZeroSuppression::Leading).unwrap()
}

fn contours(gerber: &str) -> Vec<Vec<Point>> {
    let mut contours: Vec<Vec<Point>> = Vec::new();
    for line in gerber.lines().filter(|l| l.starts_with('X')) {
        let body = line.trim_end_matches('*');
        let (x, rest) = body[1..].split_once('Y').unwrap();
        let (y, d) = rest.split_once('D').unwrap();
        let point = Point::new(decode(x), decode(y));
        if d == "02" {
            contours.push(vec![point]);
        } else {
            contours.last_mut().unwrap().push(point);
        }
    }
    contours
}

proptest! {
    #[test]
    fn prop_emitted_polygons_are_closed_and_clockwise(
        triangles in prop::collection::vec(triangle(), 1..6)
    ) {
        let output = RegionConverter::default().convert_str(&outline(&triangles)).unwrap();
        let contours = contours(&output.gerber);

        prop_assert_eq!(output.summary.num_closed_polygons, triangles.len());
        prop_assert_eq!(contours.len(), triangles.len());
        for contour in &contours {
            prop_assert_eq!(contour.first(), contour.last());
            prop_assert!(signed_area(&contour[..contour.len() - 1]) <= 0.0);
        }
    }

    #[test]
    fn prop_reconverting_output_is_identity(
        triangles in prop::collection::vec(triangle(), 1..6)
    ) {
        let converter = RegionConverter::default();
        let first = converter.convert_str(&outline(&triangles)).unwrap();
        let second = converter.convert_str(&first.gerber).unwrap();
        prop_assert_eq!(second.gerber, first.gerber);
    }
}
