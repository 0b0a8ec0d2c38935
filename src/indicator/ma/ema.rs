use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::indicator::TABuilder;
use crate::indicator::ma::MA;
use std::fmt::Display;
use std::marker::PhantomData;

/// 지수이동평균 시퀀스 계산
///
/// 평활 계수 `k = 2 / (period + 1)`를 사용하며, 첫 번째 값을 초기 EMA로 삼습니다
/// (SMA 시드를 쓰지 않음). 이후 값은 `value * k + prev * (1 - k)`입니다.
/// 데이터가 `period`보다 적어도 같은 점화식으로 계산합니다.
///
/// # Arguments
/// * `values` - 가격 배열
/// * `period` - EMA 기간
///
/// # Returns
/// * `Vec<f64>` - 입력과 같은 길이의 EMA 시퀀스
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());

    let mut prev: Option<f64> = None;
    for &value in values {
        let current = match prev {
            None => value,
            Some(p) => value * k + p * (1.0 - k),
        };
        result.push(current);
        prev = Some(current);
    }

    result
}

/// 지수이동평균(EMA) 계산 빌더
#[derive(Debug)]
pub struct EMABuilder<C: Candle> {
    /// EMA 계산 기간
    pub period: usize,
    /// 종가 버퍼
    values: Vec<f64>,
    _phantom: PhantomData<C>,
}

/// 지수이동평균(EMA) 기술적 지표
#[derive(Clone, Debug)]
pub struct EMA {
    /// EMA 계산 기간
    period: usize,
    /// 마지막 EMA 값
    ema: f64,
}

impl Display for EMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}: {:.2})", self.period, self.ema)
    }
}

impl MA for EMA {
    fn get(&self) -> f64 {
        self.ema
    }

    fn period(&self) -> usize {
        self.period
    }
}

impl<C> EMABuilder<C>
where
    C: Candle,
{
    /// 새 EMA 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("EMA 기간은 0보다 커야 합니다");
        }

        EMABuilder {
            period,
            values: Vec::new(),
            _phantom: PhantomData,
        }
    }

    fn compute(&mut self, data: &[C]) -> EMA {
        self.values.clear();
        self.values.extend(data.iter().map(|c| c.close_price()));

        let series = ema_series(&self.values, self.period);
        let ema = series.last().copied().unwrap_or(0.0);

        EMA {
            period: self.period,
            ema,
        }
    }
}

impl<C> TABuilder<EMA, C> for EMABuilder<C>
where
    C: Candle,
{
    fn from_series(&mut self, series: &CandleSeries<C>) -> EMA {
        self.compute(series.items())
    }

    fn build(&mut self, data: &[C]) -> AnalysisOutcome<EMA> {
        if data.is_empty() {
            return Err(AnalysisError::NoData);
        }
        Ok(self.compute(data))
    }
}
