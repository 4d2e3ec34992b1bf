// ABOUTME: SQL generation and driver binding from table metadata
// ABOUTME: Templates, the Value binder/decoder, and generated DDL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Metadata-driven SQL: statement templates, typed binding, and DDL.

pub mod bind;
pub mod ddl;
pub mod template;
