// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use crate::attribute::*;
use crate::error::*;
use crate::object::*;
use crate::pkcs11::*;
use crate::registry;
use crate::template::*;
use crate::token::*;

use hex;

#[macro_use]
mod util;
use util::*;

mod attrs;
mod bulk;
