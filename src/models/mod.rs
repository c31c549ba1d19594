//! Exam scheduling domain models.
//!
//! Provides the data types for describing an exam timetabling instance and
//! its solutions.
//!
//! | Type | Meaning |
//! |------|---------|
//! | `Subject` | An examinable course, identified by name |
//! | `Student` | A participant with per-subject difficulty and prior attempts |
//! | `ExamCalendar` | Horizon length and blocked days |
//! | `Schedule` | Subject-to-day assignment over a dense `SubjectIndex` |

mod calendar;
mod schedule;
mod student;
mod subject;

pub use calendar::ExamCalendar;
pub use schedule::{Assignment, Schedule};
pub use student::{Enrollment, Student};
pub use subject::{Subject, SubjectIndex};
