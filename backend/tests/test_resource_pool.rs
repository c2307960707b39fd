//! Tests for the FIFO resource pool

use call_center_sim_core::models::{Admission, ResourceError, ResourcePool, TaskId, Ticket};

fn expect_granted(admission: Admission) -> Ticket {
    match admission {
        Admission::Granted(ticket) => ticket,
        Admission::Queued { position } => panic!("expected grant, queued at {}", position),
    }
}

#[test]
fn test_grants_up_to_capacity_without_queueing() {
    let mut pool = ResourcePool::new(3).unwrap();

    let _a = expect_granted(pool.request(TaskId(1)).unwrap());
    let _b = expect_granted(pool.request(TaskId(2)).unwrap());
    let _c = expect_granted(pool.request(TaskId(3)).unwrap());

    assert_eq!(pool.in_use(), 3);
    assert_eq!(pool.available(), 0);
    assert_eq!(pool.queue_len(), 0);
}

#[test]
fn test_requests_beyond_capacity_queue_in_arrival_order() {
    let mut pool = ResourcePool::new(1).unwrap();
    let _held = expect_granted(pool.request(TaskId(1)).unwrap());

    assert_eq!(pool.request(TaskId(2)).unwrap(), Admission::Queued { position: 0 });
    assert_eq!(pool.request(TaskId(3)).unwrap(), Admission::Queued { position: 1 });
    assert_eq!(pool.request(TaskId(4)).unwrap(), Admission::Queued { position: 2 });

    assert_eq!(
        pool.waiting().collect::<Vec<_>>(),
        vec![TaskId(2), TaskId(3), TaskId(4)]
    );
    assert_eq!(pool.in_use(), 1);
}

#[test]
fn test_release_admits_waiters_fifo() {
    let mut pool = ResourcePool::new(1).unwrap();
    let mut ticket = expect_granted(pool.request(TaskId(1)).unwrap());
    for id in 2..=5 {
        pool.request(TaskId(id)).unwrap();
    }

    let mut admitted = Vec::new();
    loop {
        let Some(next) = pool.release(ticket).unwrap() else {
            break;
        };
        admitted.push(next);
        ticket = expect_granted(pool.request(next).unwrap());
        assert!(pool.in_use() <= pool.capacity());
    }

    assert_eq!(admitted, vec![TaskId(2), TaskId(3), TaskId(4), TaskId(5)]);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.outstanding_tickets(), 0);
}

#[test]
fn test_release_without_waiters_frees_unit() {
    let mut pool = ResourcePool::new(2).unwrap();
    let ticket = expect_granted(pool.request(TaskId(1)).unwrap());

    assert_eq!(pool.release(ticket).unwrap(), None);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), 2);
}

#[test]
fn test_handed_off_unit_is_reserved() {
    let mut pool = ResourcePool::new(1).unwrap();
    let ticket = expect_granted(pool.request(TaskId(1)).unwrap());
    pool.request(TaskId(2)).unwrap();

    pool.release(ticket).unwrap();

    // The unit stays counted in use until the waiter claims it
    assert_eq!(pool.in_use(), 1);
    assert_eq!(pool.queue_len(), 0);
    assert_eq!(
        pool.request(TaskId(9)).unwrap(),
        Admission::Queued { position: 0 }
    );
    let _claimed = expect_granted(pool.request(TaskId(2)).unwrap());
    assert_eq!(pool.in_use(), 1);
}

#[test]
fn test_queue_length_query_is_read_only() {
    let mut pool = ResourcePool::new(1).unwrap();
    let _held = expect_granted(pool.request(TaskId(1)).unwrap());
    pool.request(TaskId(2)).unwrap();

    assert_eq!(pool.queue_len(), 1);
    assert_eq!(pool.queue_len(), 1);
}

#[test]
fn test_requesting_twice_while_queued_fails() {
    let mut pool = ResourcePool::new(1).unwrap();
    let _held = expect_granted(pool.request(TaskId(1)).unwrap());
    pool.request(TaskId(2)).unwrap();

    assert_eq!(
        pool.request(TaskId(2)),
        Err(ResourceError::AlreadyQueued(TaskId(2)))
    );
}

#[test]
fn test_zero_capacity_pool_rejected() {
    assert!(matches!(
        ResourcePool::new(0),
        Err(ResourceError::ZeroCapacity)
    ));
}
