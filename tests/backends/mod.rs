mod foundation_sync;
mod foundation_testing;
