pub mod menu;
pub mod progress_bar;
pub mod question_card;
pub mod results_dashboard;
pub mod review_list;
