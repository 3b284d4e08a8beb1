//! End-to-end tests for `gateway-responses` live under `tests/`.
