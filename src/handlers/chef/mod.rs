// handlers/chef/mod.rs - Department head endpoints (role 1)
//
// Everything here is scoped to the head's own filière; admins may address
// any filière.

pub mod avancement;
pub mod catalog;
pub mod stats;
pub mod students;

pub use avancement::avancement_put;
pub use catalog::{
    domaine_delete, domaine_list, domaine_post, domaine_put, prerequis_delete, prerequis_list, prerequis_post,
    prerequis_put,
};
pub use stats::dashboard_get;
pub use students::{prof_list, student_delete, students_list, students_list_by_filiere, validate_student_put};
