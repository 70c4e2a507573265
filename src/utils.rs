pub mod db;
pub mod logs;
