use super::*;
use crate::queue::config::QueueConfig;

mod common;
use common::*;
