// 시장 신호 분석기 모듈
// 지표 계산, 구조 탐지, 구간/점수 합성을 하나의 파이프라인으로 묶습니다.

pub mod fair_value_gap;
pub mod narrative;
pub mod support_resistance;
pub mod zone;

pub use fair_value_gap::{FVGDirection, FairValueGap};
pub use narrative::{NarrativeInput, build_narrative};
pub use support_resistance::SupportResistance;
pub use zone::{PriceBand, ZoneParams, ZoneSet};

use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::config_loader::{AnalysisConfig, ConfigResult, ConfigValidation, DEFAULT_CONFIG};
use crate::error::AnalysisOutcome;
use crate::indicator::IndicatorSet;
use crate::model::AnalysisResult;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// 시장 신호 분석기
///
/// 상태를 갖지 않으며, 같은 인스턴스를 여러 스레드에서 동시에 사용해도 됩니다.
#[derive(Debug, Clone, Copy)]
pub struct MarketAnalyzer {
    config: AnalysisConfig,
}

impl Default for MarketAnalyzer {
    fn default() -> Self {
        MarketAnalyzer {
            config: *DEFAULT_CONFIG,
        }
    }
}

impl MarketAnalyzer {
    /// 새 분석기 생성
    ///
    /// 설정을 먼저 검증하므로 생성된 분석기는 분석 중에 실패하지 않습니다.
    ///
    /// # Arguments
    /// * `config` - 분석 설정
    ///
    /// # Returns
    /// * `ConfigResult<MarketAnalyzer>` - 분석기, 설정이 유효하지 않으면 `ValidationError`
    pub fn new(config: AnalysisConfig) -> ConfigResult<MarketAnalyzer> {
        config.validate()?;
        Ok(MarketAnalyzer { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 현재 시각으로 분석 수행
    pub fn analyze<C: Candle>(
        &self,
        symbol: &str,
        timeframe: &str,
        candles: &[C],
    ) -> AnalysisOutcome<AnalysisResult> {
        self.analyze_at(symbol, timeframe, candles, Utc::now())
    }

    /// 지정한 갱신 시각으로 분석 수행
    ///
    /// 같은 입력에 대해 `updated_at`을 제외한 모든 필드가 동일합니다.
    ///
    /// # Arguments
    /// * `symbol` - 심볼 (대문자로 정규화)
    /// * `timeframe` - 캔들 간격
    /// * `candles` - 시간 순 캔들
    /// * `updated_at` - 결과에 기록할 시각
    ///
    /// # Returns
    /// * `AnalysisOutcome<AnalysisResult>` - 분석 결과, 캔들이 없으면 `NoData`
    pub fn analyze_at<C: Candle>(
        &self,
        symbol: &str,
        timeframe: &str,
        candles: &[C],
        updated_at: DateTime<Utc>,
    ) -> AnalysisOutcome<AnalysisResult> {
        let series = CandleSeries::from_slice(candles)?;
        debug!("{} {} 분석 시작: 캔들 {}개", symbol, timeframe, series.len());

        for issue in series.issues() {
            warn!("{} 입력 캔들 문제: {}", symbol, issue);
        }

        Ok(self.analyze_series(symbol, timeframe, &series, updated_at))
    }

    /// 검증된 시리즈로 분석 수행 (실패하지 않음)
    pub fn analyze_series<C: Candle>(
        &self,
        symbol: &str,
        timeframe: &str,
        series: &CandleSeries<C>,
        updated_at: DateTime<Utc>,
    ) -> AnalysisResult {
        let price = series.last().close_price();

        let indicators = IndicatorSet::calculate(series, &self.config.indicators);
        let levels = SupportResistance::detect(series, self.config.lookback);
        let fvg = FairValueGap::from_series(series);
        debug!("구조 탐지 완료: {}, FVG: {:?}", levels, fvg);

        let zones = ZoneSet::synthesize(price, &indicators, &levels, &fvg, &self.config.zones);
        debug!(
            "구간 합성 완료: 매수 {} (폭 {:.4}), 매도 {} (폭 {:.4}), 점수 {}",
            zones.buy_standard,
            zones.buy_standard.width(),
            zones.sell_standard,
            zones.sell_standard.width(),
            zones.confidence
        );

        let narrative = build_narrative(&NarrativeInput {
            price,
            indicators: &indicators,
            levels: &levels,
            zones: &zones,
            fvg: &fvg,
        });

        let result = AnalysisResult {
            symbol: symbol.to_uppercase(),
            timeframe: timeframe.to_string(),
            price,
            indicators,
            levels,
            zones,
            fvg,
            narrative,
            updated_at,
        };

        info!("분석 완료: {}", result);
        result
    }
}

/// 기본 설정으로 분석 수행
///
/// # Arguments
/// * `symbol` - 심볼
/// * `timeframe` - 캔들 간격
/// * `candles` - 시간 순 캔들
///
/// # Returns
/// * `AnalysisOutcome<AnalysisResult>` - 분석 결과, 캔들이 없으면 `NoData`
pub fn analyze<C: Candle>(
    symbol: &str,
    timeframe: &str,
    candles: &[C],
) -> AnalysisOutcome<AnalysisResult> {
    MarketAnalyzer::default().analyze(symbol, timeframe, candles)
}
