use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::Attendance;
use crate::model::distance::DailyDistance;
use crate::model::employee::Employee;
use crate::model::payroll::PayrollStatus;
use crate::utils::geo::round2;

#[derive(Debug, Error, PartialEq)]
pub enum PayrollError {
    /// An employee without a usable hourly rate must fail loudly; a
    /// defaulted zero would produce a record that looks valid and pays
    /// nothing.
    #[error("employee {employee_id} has no usable base pay rate")]
    InvalidConfiguration { employee_id: u64 },
}

/// The computed payroll for one employee over one period, before the
/// caller persists it. Status always starts at `calculated`; the
/// approve/pay transitions happen elsewhere.
#[derive(Debug, PartialEq)]
pub struct PayrollDraft {
    pub employee_id: u64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub hours_worked: f64,
    pub distance_traveled: f64,
    pub base_pay: f64,
    pub distance_pay: f64,
    pub total_pay: f64,
    pub status: PayrollStatus,
}

/// Derives one payroll record from the employee's rates plus the
/// attendance and daily-distance rows the store already filtered to
/// this employee and period.
///
/// Attendance rows without a check-out contribute zero hours; an
/// employee without a distance rate earns no distance pay regardless of
/// recorded travel. Pay is computed from the full-precision running
/// sums and only the stored values are rounded, so rounding never
/// compounds across records.
pub fn calculate_payroll(
    employee: &Employee,
    attendance: &[Attendance],
    distances: &[DailyDistance],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<PayrollDraft, PayrollError> {
    let base_rate = employee
        .base_pay_rate
        .filter(|rate| rate.is_finite() && *rate >= 0.0)
        .ok_or(PayrollError::InvalidConfiguration {
            employee_id: employee.id,
        })?;

    let hours_total: f64 = attendance
        .iter()
        .filter_map(|record| {
            let check_out = record.check_out_time?;
            Some((check_out - record.check_in_time).num_seconds() as f64 / 3600.0)
        })
        .sum();

    let distance_total: f64 = distances.iter().map(|day| day.distance_km).sum();

    let base_pay = round2(hours_total * base_rate);
    let distance_pay = match employee.distance_pay_rate {
        Some(rate) => round2(distance_total * rate),
        None => 0.0,
    };

    Ok(PayrollDraft {
        employee_id: employee.id,
        period_start,
        period_end,
        hours_worked: round2(hours_total),
        distance_traveled: round2(distance_total),
        base_pay,
        distance_pay,
        total_pay: round2(base_pay + distance_pay),
        status: PayrollStatus::Calculated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, minute, 0).unwrap()
    }

    fn employee(base: Option<f64>, distance: Option<f64>) -> Employee {
        Employee {
            id: 1001,
            employee_code: "FLD-001".into(),
            first_name: "Ravi".into(),
            last_name: "Sharma".into(),
            email: "ravi.sharma@company.com".into(),
            phone: None,
            job_role: "technician".into(),
            specialization: Some("ac_repair".into()),
            active: true,
            base_pay_rate: base,
            distance_pay_rate: distance,
            hire_date: date(1),
        }
    }

    fn shift(day: u32, check_out: Option<NaiveDateTime>) -> Attendance {
        Attendance {
            id: 0,
            employee_id: 1001,
            work_date: date(day),
            check_in_time: at(day, 9, 0),
            check_out_time: check_out,
            status: "present".into(),
            notes: None,
        }
    }

    fn traveled(day: u32, km: f64) -> DailyDistance {
        DailyDistance {
            id: 0,
            employee_id: 1001,
            travel_date: date(day),
            distance_km: km,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn eight_hour_day_at_rate_100() {
        let draft = calculate_payroll(
            &employee(Some(100.0), None),
            &[shift(5, Some(at(5, 17, 0)))],
            &[],
            date(1),
            date(15),
        )
        .unwrap();

        assert_eq!(draft.hours_worked, 8.00);
        assert_eq!(draft.base_pay, 800.00);
        assert_eq!(draft.distance_pay, 0.0);
        assert_eq!(draft.total_pay, 800.00);
        assert_eq!(draft.status, PayrollStatus::Calculated);
    }

    #[test]
    fn missing_check_out_contributes_zero_hours() {
        let draft = calculate_payroll(
            &employee(Some(100.0), None),
            &[shift(5, Some(at(5, 17, 0))), shift(6, None)],
            &[],
            date(1),
            date(15),
        )
        .unwrap();

        assert_eq!(draft.hours_worked, 8.00);
        assert_eq!(draft.base_pay, 800.00);
    }

    #[test]
    fn pay_comes_from_unrounded_hour_sums() {
        // 8h20m = 8.3333... hours; pay from the rounded 8.33 would be
        // 833.00, pay from the unrounded sum is 833.33.
        let draft = calculate_payroll(
            &employee(Some(100.0), None),
            &[shift(5, Some(at(5, 17, 20)))],
            &[],
            date(1),
            date(15),
        )
        .unwrap();

        assert_eq!(draft.hours_worked, 8.33);
        assert_eq!(draft.base_pay, 833.33);
    }

    #[test]
    fn distance_pay_requires_a_configured_rate() {
        let draft = calculate_payroll(
            &employee(Some(100.0), None),
            &[],
            &[traveled(5, 12.5), traveled(6, 7.25)],
            date(1),
            date(15),
        )
        .unwrap();

        assert_eq!(draft.distance_traveled, 19.75);
        assert_eq!(draft.distance_pay, 0.0);
    }

    #[test]
    fn distance_pay_applies_the_per_km_rate() {
        let draft = calculate_payroll(
            &employee(Some(100.0), Some(4.0)),
            &[shift(5, Some(at(5, 17, 0)))],
            &[traveled(5, 12.5), traveled(6, 7.25)],
            date(1),
            date(15),
        )
        .unwrap();

        assert_eq!(draft.distance_pay, 79.00);
        assert_eq!(draft.total_pay, 879.00);
    }

    #[test]
    fn missing_base_rate_is_a_configuration_error() {
        let err = calculate_payroll(&employee(None, Some(4.0)), &[], &[], date(1), date(15))
            .unwrap_err();
        assert_eq!(err, PayrollError::InvalidConfiguration { employee_id: 1001 });
    }

    #[test]
    fn non_finite_base_rate_is_a_configuration_error() {
        assert!(
            calculate_payroll(&employee(Some(f64::NAN), None), &[], &[], date(1), date(15)).is_err()
        );
        assert!(
            calculate_payroll(&employee(Some(-1.0), None), &[], &[], date(1), date(15)).is_err()
        );
    }

    #[test]
    fn empty_period_yields_a_valid_zero_record() {
        let draft =
            calculate_payroll(&employee(Some(100.0), Some(4.0)), &[], &[], date(1), date(15))
                .unwrap();

        assert_eq!(draft.hours_worked, 0.0);
        assert_eq!(draft.distance_traveled, 0.0);
        assert_eq!(draft.total_pay, 0.0);
        assert_eq!(draft.status, PayrollStatus::Calculated);
    }

    #[test]
    fn total_is_base_plus_distance() {
        let draft = calculate_payroll(
            &employee(Some(97.5), Some(3.3)),
            &[shift(5, Some(at(5, 16, 47))), shift(6, Some(at(6, 18, 5)))],
            &[traveled(5, 11.13), traveled(6, 23.87)],
            date(1),
            date(15),
        )
        .unwrap();

        assert!((draft.total_pay - (draft.base_pay + draft.distance_pay)).abs() < 1e-9);
    }
}
