use super::*;
use crate::downloader::test_helpers::*;
use crate::error::DownloadError;
use crate::test_helpers::{MockContentSource, sample_goal, sample_unit};
use crate::types::{LearningGoalSummary, Uid};
