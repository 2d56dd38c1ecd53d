mod app;
mod form;
mod theme;
mod views;

pub use app::PlannerApp;
