// Posterior integrands
pub mod likelihood;
// Output files
pub mod output;
// Semi-infinite adaptive quadrature
pub mod quadrature;
// Dose level selection
pub mod selection;
// Settings
pub mod settings;
