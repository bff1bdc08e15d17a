pub mod board_ui;
