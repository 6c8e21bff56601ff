//! 기술 통계 유틸리티.
//!
//! 매크로 시계열 파생값(평균, 추세, 모멘텀)과 대시보드 상관 분석에서 공유합니다.
//! 입력이 비어 있거나 정의되지 않는 경우 `None`을 반환합니다.

/// 산술 평균.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 중앙값. 짝수 길이면 가운데 두 값의 평균.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// 표본 표준편차 (n - 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson 상관계수.
///
/// 길이가 다르거나 2개 미만이거나 분산이 0이면 `None`.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let (cov, var_x, var_y) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(cov, vx, vy), (a, b)| {
        let dx = a - mean_x;
        let dy = b - mean_y;
        (cov + dx * dy, vx + dx * dx, vy + dy * dy)
    });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// 가격 시계열 → 단순 수익률.
///
/// 이전 가격이 0인 구간은 건너뜁니다.
pub fn prices_to_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// 기준값 대비 변화율 (%).
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_std_dev_sample() {
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
        assert_eq!(std_dev(&[1.0]), None);
    }

    #[test]
    fn test_correlation_identical_and_inverse() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let inverse: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!((correlation(&x, &x).unwrap() - 1.0).abs() < 1e-9);
        assert!((correlation(&x, &inverse).unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_undefined() {
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(correlation(&[1.0], &[1.0]), None);
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_prices_to_returns() {
        let returns = prices_to_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(0.0, 1.0), None);
        assert!((pct_change(200.0, 210.0).unwrap() - 5.0).abs() < 1e-12);
    }
}
