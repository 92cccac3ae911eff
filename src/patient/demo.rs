//! Fixed demonstration dataset loaded by the seed operation

use super::record::Patient;

/// The starter records, in the order they are written.
pub fn demo_patients() -> Vec<Patient> {
    vec![
        Patient {
            nin: "123456789".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: "1990-01-01".into(),
            sex: "M".into(),
            mother_nin: "987654321".into(),
            father_nin: "876543210".into(),
            family_medical_history: "None".into(),
            allergy: "Peanuts".into(),
            chronic_illnesses: "Asthma".into(),
            amended_from: String::new(),
        },
        Patient {
            nin: "987654321".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            date_of_birth: "1985-02-02".into(),
            sex: "F".into(),
            mother_nin: "123456789".into(),
            father_nin: "234567890".into(),
            family_medical_history: "Diabetes".into(),
            allergy: "None".into(),
            chronic_illnesses: "None".into(),
            amended_from: String::new(),
        },
    ]
}
