//! Bundled sample records used when no data file exists yet

use super::snapshot::BookSnapshot;
use crate::domain::{
    ClaimStatus, Employee, ExpenseClaim, RecruitmentPosting, Schedule, Shift, Tag, ValidationError,
};

const EMPLOYEES: &[[&str; 8]] = &[
    ["000001", "Alex Yeoh", "87438807", "alexyeoh@example.com", "Engineering", "Software Engineer", "5200", "remote"],
    ["000002", "Bernice Yu", "99272758", "berniceyu@example.com", "Marketing", "Marketing Executive", "4100", "lead"],
    ["000003", "Charlotte Oliveiro", "93210283", "charlotte@example.com", "Finance", "Accountant", "4600", ""],
    ["000004", "David Li", "91031282", "lidavid@example.com", "Engineering", "QA Engineer", "4300", "parttime"],
    ["000005", "Irfan Ibrahim", "92492021", "irfan@example.com", "Operations", "Logistics Officer", "3800", ""],
    ["000006", "Roy Balakrishnan", "92624417", "royb@example.com", "Human Resources", "HR Manager", "6000", "lead"],
];

const SCHEDULES: &[[&str; 3]] = &[
    ["000001", "04/04/2019", "morning"],
    ["000002", "01/01/2019", "afternoon"],
    ["000004", "04/04/2019", "night"],
    ["000005", "20/03/2099", "full"],
];

const CLAIMS: &[[&str; 5]] = &[
    ["000001", "12/03/2024", "18.50", "Taxi to client site", "pending"],
    ["000002", "15/03/2024", "120", "Conference registration", "approved"],
    ["000004", "02/04/2024", "45.90", "Team lunch", "rejected"],
];

const POSTINGS: &[[&str; 5]] = &[
    ["Data Analyst", "Finance", "4800", "2", "Degree in statistics or a related field"],
    ["Software Engineer", "Engineering", "5500", "3", "Two years of Rust or Java experience"],
];

/// Builds the sample record book
pub fn sample_snapshot() -> Result<BookSnapshot, ValidationError> {
    let employees = EMPLOYEES
        .iter()
        .map(|[id, name, phone, email, department, position, salary, tag]| -> Result<Employee, ValidationError> {
            let employee = Employee::new(
                id.parse()?,
                name.parse()?,
                phone.parse()?,
                email.parse()?,
                department.parse()?,
                position.parse()?,
                salary.parse()?,
            );
            let tags: Vec<Tag> = if tag.is_empty() { vec![] } else { vec![tag.parse()?] };
            Ok(employee.with_tags(tags))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let schedules = SCHEDULES
        .iter()
        .map(|[id, date, shift]| -> Result<Schedule, ValidationError> {
            Ok(Schedule::new(id.parse()?, date.parse()?, shift.parse::<Shift>()?))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let claims = CLAIMS
        .iter()
        .map(|[id, date, amount, description, status]| -> Result<ExpenseClaim, ValidationError> {
            let claim =
                ExpenseClaim::new(id.parse()?, date.parse()?, amount.parse()?, description.parse()?);
            Ok(claim.with_status(status.parse::<ClaimStatus>()?))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let postings = POSTINGS
        .iter()
        .map(|[title, department, salary, vacancies, requirements]| -> Result<RecruitmentPosting, ValidationError> {
            Ok(RecruitmentPosting::new(
                title.parse()?,
                department.parse()?,
                salary.parse()?,
                vacancies.parse()?,
                requirements.parse()?,
            ))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(BookSnapshot {
        employees,
        schedules,
        claims,
        postings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UniqueList;

    #[test]
    fn sample_data_is_valid_and_unique() {
        let sample = sample_snapshot().unwrap();

        assert_eq!(sample.employees.len(), EMPLOYEES.len());
        assert!(UniqueList::check_unique(&sample.employees).is_ok());
        assert!(UniqueList::check_unique(&sample.schedules).is_ok());
        assert!(UniqueList::check_unique(&sample.claims).is_ok());
        assert!(UniqueList::check_unique(&sample.postings).is_ok());
    }

    #[test]
    fn sample_schedules_reference_sample_employees() {
        let sample = sample_snapshot().unwrap();
        for schedule in &sample.schedules {
            assert!(sample.employees.iter().any(|e| e.id == schedule.employee_id));
        }
        for claim in &sample.claims {
            assert!(sample.employees.iter().any(|e| e.id == claim.employee_id));
        }
    }
}
