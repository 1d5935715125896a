use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ARM event map is unbalanced: {0} `.name` entries but {1} `.code` entries")]
    ArmFieldMismatch(usize, usize),

    #[error("Cannot read the value of `{0}` at line {1}")]
    ArmFieldValue(String, usize),
}
