// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod backup;
pub mod charge;
pub mod chart;
pub mod compare;
pub mod costs;
pub mod doctor;
pub mod exporter;
pub mod period;
pub mod settings;
pub mod summary;
