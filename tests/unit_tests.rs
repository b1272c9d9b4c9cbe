// Unit tests for the car price estimator

use car_price_estimator::core::{
    build_feature_row, extract_number, normalize,
    encoding::{CategoryEncoder, EncoderSet, Encoding},
    features::{FeatureOrder, ACCELERATION, CAPACITY, COMPANY, ENGINE, FUEL, HORSEPOWER, MODEL, SEATS, TOP_SPEED, TORQUE},
    pricing::{confidence_band, format_price, price_tier},
    Estimator,
};
use car_price_estimator::models::{BandMethod, PriceTier, PricingPolicy, RawInputs};
use car_price_estimator::services::{ForestModel, ModelContext, RegressionTree, Regressor, TreeNode};
use std::collections::HashMap;

fn training_order() -> FeatureOrder {
    FeatureOrder::new([
        COMPANY, MODEL, ENGINE, CAPACITY, HORSEPOWER, TOP_SPEED, ACCELERATION, FUEL, SEATS, TORQUE,
    ])
    .unwrap()
}

fn encoders() -> EncoderSet {
    let mut map = HashMap::new();
    map.insert(COMPANY.to_string(), CategoryEncoder::new(["BMW", "Honda", "Toyota"]).unwrap());
    map.insert(MODEL.to_string(), CategoryEncoder::new(["Civic", "Corolla", "M5"]).unwrap());
    map.insert(ENGINE.to_string(), CategoryEncoder::new(["I4", "V6", "V8"]).unwrap());
    map.insert(FUEL.to_string(), CategoryEncoder::new(["Diesel", "Electric", "Petrol"]).unwrap());
    EncoderSet::new(map)
}

fn corolla() -> RawInputs {
    RawInputs {
        company: "Toyota".to_string(),
        model: "Corolla".to_string(),
        engine: "I4".to_string(),
        capacity: Some("1998 cc".to_string()),
        horsepower: Some("150 hp".to_string()),
        top_speed: Some("220 km/h".to_string()),
        accel: Some("8.5 sec".to_string()),
        torque: Some("240 Nm".to_string()),
        seats: 5,
        fuel: "Petrol".to_string(),
    }
}

fn single_leaf_tree(value: f64) -> RegressionTree {
    RegressionTree {
        nodes: vec![TreeNode::Leaf { value }],
    }
}

#[test]
fn test_extract_number_examples() {
    assert_eq!(extract_number("220 km/h"), Some(220.0));
    assert_eq!(extract_number("8.5 sec"), Some(8.5));
    assert_eq!(extract_number("no data"), None);
}

#[test]
fn test_encode_category_known_and_unseen() {
    let encoders = encoders();

    assert_eq!(encoders.encode_category(COMPANY, "Toyota"), 2);
    assert_eq!(encoders.encode_category(COMPANY, "Lada"), -1);
    assert_eq!(encoders.encode_category("Doors", "4"), 0);
    assert_eq!(encoders.encode(FUEL, "Hydrogen"), Encoding::Unseen);
}

#[test]
fn test_end_to_end_feature_values() {
    let row = build_feature_row(&corolla(), &encoders(), &training_order());

    assert_eq!(
        row.values(),
        vec![
            Some(2.0),    // company
            Some(1.0),    // model
            Some(0.0),    // engine
            Some(1998.0), // capacity
            Some(150.0),  // horsepower
            Some(220.0),  // top speed
            Some(8.5),    // acceleration
            Some(2.0),    // fuel
            Some(5.0),    // seats
            Some(240.0),  // torque
        ]
    );
}

#[test]
fn test_row_has_exact_order_for_partial_inputs() {
    let order = training_order();
    let inputs = RawInputs {
        company: String::new(),
        model: String::new(),
        engine: String::new(),
        capacity: None,
        horsepower: None,
        top_speed: None,
        accel: None,
        torque: None,
        seats: 2,
        fuel: String::new(),
    };

    let normalized = normalize(&inputs, &encoders(), &order);
    let names: Vec<&str> = normalized.row.names().collect();
    let expected: Vec<&str> = order.names().iter().map(String::as_str).collect();

    assert_eq!(names, expected);
    assert_eq!(normalized.missing.len(), 5);
    assert_eq!(normalized.unseen().count(), 4);
}

#[test]
fn test_estimate_with_forest_band() {
    let model = ForestModel {
        n_features: 10,
        trees: (0..=10).map(|i| single_leaf_tree(20_000.0 + i as f64 * 1_000.0)).collect(),
    };
    assert_eq!(model.member_predictions(&[None; 10]).unwrap().len(), 11);

    let context = ModelContext::new(Box::new(model), encoders(), training_order());
    let estimate = Estimator::default().estimate(&context, &corolla()).unwrap();

    assert_eq!(estimate.price, 25_000.0);
    assert_eq!(estimate.display_price, "PKR 7,000,000");
    assert_eq!(estimate.band.method, BandMethod::EnsemblePercentile);
    assert!((estimate.band.low - 21_000.0).abs() < 1e-6);
    assert!((estimate.band.high - 29_000.0).abs() < 1e-6);
    assert_eq!(estimate.tier, PriceTier::Luxury);
}

#[test]
fn test_custom_pricing_policy() {
    let policy = PricingPolicy {
        currency: "USD".to_string(),
        rate: 1.0,
        band_fraction: 0.25,
        ..PricingPolicy::default()
    };

    assert_eq!(format_price(18_500.4, &policy), "USD 18,500");

    let band = confidence_band(20_000.0, &[], &policy);
    assert_eq!(band.method, BandMethod::FixedFraction);
    assert_eq!(band.low, 15_000.0);
    assert_eq!(band.high, 25_000.0);
}

#[test]
fn test_price_tier_boundaries() {
    assert_eq!(price_tier(1_499_999.0), PriceTier::Budget);
    assert_eq!(price_tier(2_999_999.0), PriceTier::MidRange);
    assert_eq!(price_tier(4_999_999.0), PriceTier::Premium);
    assert_eq!(price_tier(12_000_000.0), PriceTier::Luxury);
    assert!(PriceTier::Budget.suggestion().contains("fuel efficiency"));
}
