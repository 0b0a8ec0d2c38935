use common_test_utils::*;

use chrono::{TimeZone, Utc};
use market_signal::analyzer::{FVGDirection, FairValueGap, MarketAnalyzer};
use market_signal::analyzer::ZoneParams;
use market_signal::config_loader::{AnalysisConfig, ConfigError};
use market_signal::indicator::IndicatorParams;
use market_signal::{AnalysisError, analyze};

#[test]
fn test_linear_uptrend_end_to_end() {
    let candles = create_linear_candles(250, 100.0, 150.0);
    let result = analyze("btcusdt", "1h", &candles).unwrap();

    assert_eq!(result.symbol, "BTCUSDT");
    assert_eq!(result.timeframe, "1h");
    assert!((result.price - 150.0).abs() < 1e-9);
    assert!(result.indicators.ema50 > result.indicators.ema200);
    assert!(result.narrative.contains("Bullish bias (EMA50 > EMA200)."));
    assert!(result.indicators.vwap > 100.0 && result.indicators.vwap < 150.0);
    assert_eq!(result.fvg, FairValueGap::Absent);
    assert!(
        result
            .narrative
            .contains("No clear Fair Value Gap detected in recent candles.")
    );
    assert!(result.zones.confidence == 2 || result.zones.confidence == 3);
}

#[test]
fn test_empty_input_is_no_data() {
    let candles: Vec<TestCandle> = Vec::new();
    assert_eq!(analyze("BTCUSDT", "1h", &candles).unwrap_err(), AnalysisError::NoData);
}

#[test]
fn test_deterministic_for_fixed_time() {
    let candles = create_random_candles(120, 7);
    let analyzer = MarketAnalyzer::default();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let first = analyzer.analyze_at("ETHUSDT", "4h", &candles, at).unwrap();
    let second = analyzer.analyze_at("ETHUSDT", "4h", &candles, at).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_only_updated_at_differs_between_calls() {
    let candles = create_random_candles(80, 11);
    let analyzer = MarketAnalyzer::default();

    let mut first = serde_json::to_value(analyzer.analyze("SOLUSDT", "1h", &candles).unwrap()).unwrap();
    let mut second = serde_json::to_value(analyzer.analyze("SOLUSDT", "1h", &candles).unwrap()).unwrap();

    first["updated_at"] = serde_json::Value::Null;
    second["updated_at"] = serde_json::Value::Null;
    assert_eq!(first, second);
}

#[test]
fn test_short_series_degrades_gracefully() {
    let candles = create_linear_candles(10, 100.0, 109.0);
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();

    assert!(result.indicators.ema200.is_finite());
    assert!(result.indicators.ema50.is_finite());
    // 20캔들 윈도우보다 짧으면 전체 캔들 사용
    assert_eq!(result.levels.support, 100.0);
    assert_eq!(result.levels.resistance, 109.0);
    // TR 9개의 평균 (각 1.0)
    assert!((result.indicators.atr14 - 1.0).abs() < 1e-9);
}

#[test]
fn test_single_candle() {
    let candles = vec![TestCandle::new(0, 10.0, 12.0, 9.0, 11.0, 5.0)];
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();

    assert_eq!(result.indicators.atr14, 0.0);
    assert_eq!(result.indicators.ema50, 11.0);
    assert_eq!(result.indicators.ema200, 11.0);
    assert_eq!(result.fvg, FairValueGap::Absent);
    assert_eq!(result.zones.buy_aggressive.width(), 0.0);
    assert_eq!(result.zones.sell_standard.width(), 0.0);
    // EMA50 == EMA200 이므로 약세 편향
    assert!(result.narrative.contains("Bearish bias (EMA50 <= EMA200)."));
}

#[test]
fn test_zero_volume_vwap_is_last_close() {
    let candles = vec![
        TestCandle::new(0, 10.0, 11.0, 9.0, 10.5, 0.0),
        TestCandle::new(3600, 10.5, 12.0, 10.0, 11.5, 0.0),
        TestCandle::new(7200, 11.5, 12.5, 11.0, 12.0, 0.0),
    ];
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();
    assert_eq!(result.indicators.vwap, 12.0);
}

#[test]
fn test_three_candle_bullish_gap() {
    let candles = vec![
        TestCandle::new(0, 10.0, 11.0, 9.0, 10.5, 1.0),
        TestCandle::new(3600, 12.0, 13.0, 11.5, 12.5, 1.0),
        TestCandle::new(7200, 12.5, 13.2, 12.0, 12.8, 1.0),
    ];
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();

    assert_eq!(
        result.fvg,
        FairValueGap::Present {
            direction: FVGDirection::Bullish,
            range: (11.0, 11.5),
            candle_index: 1,
        }
    );
    assert!(
        result
            .narrative
            .contains("Fair Value Gap detected (bullish) at 11.00 - 11.50.")
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["fvg"]["exists"], true);
    assert_eq!(json["fvg"]["direction"], "bullish");
    assert_eq!(json["fvg"]["range"], serde_json::json!([11.0, 11.5]));
}

#[test]
fn test_three_candles_without_gap() {
    let candles = vec![
        TestCandle::new(0, 10.0, 11.0, 9.0, 10.5, 1.0),
        TestCandle::new(3600, 10.5, 11.5, 10.0, 11.0, 1.0),
        TestCandle::new(7200, 11.0, 12.0, 10.8, 11.8, 1.0),
    ];
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();
    assert_eq!(result.fvg, FairValueGap::Absent);
    assert_eq!(serde_json::to_value(&result).unwrap()["fvg"], serde_json::json!({"exists": false}));
}

#[test]
fn test_zone_ordering_and_confidence_bounds() {
    let analyzer = MarketAnalyzer::default();
    for seed in 0..200u64 {
        let count = 1 + (seed as usize * 7) % 260;
        let candles = create_random_candles(count, seed);
        let result = analyzer.analyze("TEST", "1h", &candles).unwrap();

        let zones = &result.zones;
        let support = result.levels.support;
        assert!(zones.buy_aggressive.low <= zones.buy_aggressive.high, "seed {}", seed);
        assert!(zones.buy_aggressive.high <= zones.buy_standard.high, "seed {}", seed);
        assert!(zones.sell_standard.low <= zones.sell_standard.high, "seed {}", seed);
        assert!(zones.buy_aggressive.high <= support * 1.03 + 1e-9, "seed {}", seed);
        assert!(zones.buy_standard.high <= support * 1.03 + 1e-9, "seed {}", seed);
        assert!((-1..=4).contains(&zones.confidence), "seed {}", seed);
    }
}

#[test]
fn test_downtrend_is_bearish() {
    let candles = create_downtrend_candles(220, 300.0, 0.5);
    let result = analyze("BTCUSDT", "1d", &candles).unwrap();

    assert!(result.indicators.ema50 < result.indicators.ema200);
    // VWAP가 가격보다 위이고 갭이 없으므로 -1
    assert_eq!(result.zones.confidence, -1);
    assert!(result.narrative.starts_with("Price: "));
    assert!(
        result
            .narrative
            .ends_with("Use stop-loss around 1*ATR below support for conservative positions.")
    );
}

#[test]
fn test_custom_lookback() {
    let candles = create_linear_candles(100, 100.0, 199.0);
    let config = AnalysisConfig {
        lookback: 5,
        ..AnalysisConfig::default()
    };
    let result = MarketAnalyzer::new(config)
        .unwrap()
        .analyze("BTCUSDT", "1h", &candles)
        .unwrap();
    // 최근 5개 캔들: 종가 195..199, 첫 캔들 시가는 194
    assert_eq!(result.levels.support, 194.0);
    assert_eq!(result.levels.resistance, 199.0);
}

#[test]
fn test_compact_summary_matches_result() {
    let candles = create_random_candles(60, 3);
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();
    let compact = result.compact();
    assert_eq!(compact.price, result.price);
    assert_eq!(compact.ema50, result.indicators.ema50);
    assert_eq!(compact.buy_zone, result.zones.buy_standard);
    assert_eq!(compact.sell_zone, result.zones.sell_standard);
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let zero_period = AnalysisConfig {
        indicators: IndicatorParams {
            ema_fast: 0,
            ..IndicatorParams::default()
        },
        ..AnalysisConfig::default()
    };
    match MarketAnalyzer::new(zero_period) {
        Err(ConfigError::ValidationError(_)) => (),
        other => panic!("ValidationError가 발생해야 함: {:?}", other),
    }

    let inverted_zones = AnalysisConfig {
        zones: ZoneParams {
            aggressive_atr_multiple: 1.0,
            standard_atr_multiple: 0.5,
            ..ZoneParams::default()
        },
        ..AnalysisConfig::default()
    };
    assert!(MarketAnalyzer::new(inverted_zones).is_err());

    let analyzer = MarketAnalyzer::new(AnalysisConfig::default()).unwrap();
    assert_eq!(analyzer.config(), &AnalysisConfig::default());
}

#[test]
fn test_narrative_rounds_tie_support_up() {
    let candles = vec![TestCandle::new(0, 101.0, 102.0, 100.125, 101.5, 1.0)];
    let result = analyze("BTCUSDT", "1h", &candles).unwrap();

    assert_eq!(result.levels.support, 100.125);
    assert!(result.narrative.contains("Support ~ 100.13, Resistance ~ 102.00."));
    assert!(result.narrative.contains("Aggressive buy zone: 100.13 - 100.13."));
}
