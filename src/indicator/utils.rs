use crate::candle::Candle;

/// 최근 `period`개 값의 단순 평균
///
/// 값이 `period`보다 적으면 가용한 값 전체의 평균을 사용합니다.
///
/// # Arguments
/// * `values` - 값 배열
/// * `period` - 계산 기간
///
/// # Returns
/// * `f64` - 평균 (값이 없거나 period가 0이면 0.0)
pub fn trailing_mean(values: &[f64], period: usize) -> f64 {
    if values.is_empty() || period == 0 {
        return 0.0;
    }

    let start_idx = values.len().saturating_sub(period);
    let slice = &values[start_idx..];
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// True Range 목록 계산
///
/// 두 번째 캔들부터 `max(고가-저가, |고가-이전종가|, |저가-이전종가|)`를 계산합니다.
/// 결과 길이는 `data.len() - 1` (캔들이 1개 이하이면 빈 목록)입니다.
pub fn true_ranges<C: Candle>(data: &[C]) -> Vec<f64> {
    data.windows(2)
        .map(|pair| {
            let prev_close = pair[0].close_price();
            let high = pair[1].high_price();
            let low = pair[1].low_price();
            (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs())
        })
        .collect()
}
